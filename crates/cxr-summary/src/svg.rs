//! SVG generation for the refresh summary.
//!
//! Uses `quick-xml`'s writer API; text content is escaped by the writer, so
//! upstream country names can be emitted verbatim.

use std::io::Cursor;

use chrono::{DateTime, SecondsFormat, Utc};
use cxr_core::{
  country::Country,
  summary::{TOP_COUNT, format_usd, top_by_gdp},
};
use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{Error, Result};

pub const MEDIA_TYPE: &str = "image/svg+xml";
pub const NS_SVG: &str = "http://www.w3.org/2000/svg";

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

const FONT_FAMILY: &str = "DejaVu Sans, Verdana, sans-serif";

// ─── Text styles ─────────────────────────────────────────────────────────────

struct TextStyle {
  size: u32,
  bold: bool,
  fill: &'static str,
}

const TITLE: TextStyle = TextStyle { size: 32, bold: true, fill: "#2C3E50" };
const HEADER: TextStyle = TextStyle { size: 20, bold: true, fill: "#34495E" };
const BODY: TextStyle = TextStyle { size: 16, bold: false, fill: "#34495E" };
const MUTED: TextStyle = TextStyle { size: 16, bold: false, fill: "#7F8C8D" };

const RANK_TOP: u32 = 230;
const RANK_STEP: u32 = 35;

// ─── Document ────────────────────────────────────────────────────────────────

/// Render the summary of one refresh as a fixed-size SVG document.
///
/// Output depends only on the arguments.
pub fn render_svg(countries: &[Country], refreshed_at: DateTime<Utc>) -> Result<Vec<u8>> {
  let mut w = Writer::new(Cursor::new(Vec::new()));

  emit(&mut w, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

  let width = WIDTH.to_string();
  let height = HEIGHT.to_string();
  let view_box = format!("0 0 {WIDTH} {HEIGHT}");
  let mut svg = BytesStart::new("svg");
  svg.push_attribute(("xmlns", NS_SVG));
  svg.push_attribute(("width", width.as_str()));
  svg.push_attribute(("height", height.as_str()));
  svg.push_attribute(("viewBox", view_box.as_str()));
  svg.push_attribute(("font-family", FONT_FAMILY));
  emit(&mut w, Event::Start(svg))?;

  write_empty_with_attr(
    &mut w,
    "rect",
    &[("width", &width), ("height", &height), ("fill", "#FFFFFF")],
  )?;

  write_text(&mut w, 50, 62, &TITLE, "Country Data Summary")?;
  write_text(
    &mut w,
    50,
    110,
    &HEADER,
    &format!("Total Countries: {}", countries.len()),
  )?;
  write_text(
    &mut w,
    50,
    140,
    &MUTED,
    &format!(
      "Last Refreshed: {}",
      refreshed_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ),
  )?;
  write_text(
    &mut w,
    50,
    190,
    &HEADER,
    &format!("Top {TOP_COUNT} Countries by Estimated GDP:"),
  )?;

  let mut y = RANK_TOP;
  for (rank, country) in top_by_gdp(countries, TOP_COUNT).into_iter().enumerate() {
    let line = format!(
      "{}. {}: {}",
      rank + 1,
      country.name,
      format_usd(country.estimated_gdp)
    );
    write_text(&mut w, 70, y, &BODY, &line)?;
    y += RANK_STEP;
  }

  emit(&mut w, Event::End(BytesEnd::new("svg")))?;
  Ok(w.into_inner().into_inner())
}

// ─── XML writer helpers
// ───────────────────────────────────────────────────────

fn emit(w: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<()> {
  w.write_event(event).map_err(|e| Error::Svg(e.to_string()))
}

fn write_empty_with_attr(
  w: &mut Writer<Cursor<Vec<u8>>>,
  tag: &str,
  attrs: &[(&str, &str)],
) -> Result<()> {
  let mut el = BytesStart::new(tag);
  for (k, v) in attrs {
    el.push_attribute((*k, *v));
  }
  emit(w, Event::Empty(el))
}

fn write_text(
  w: &mut Writer<Cursor<Vec<u8>>>,
  x: u32,
  y: u32,
  style: &TextStyle,
  text: &str,
) -> Result<()> {
  let (x, y, size) = (x.to_string(), y.to_string(), style.size.to_string());
  let mut el = BytesStart::new("text");
  el.push_attribute(("x", x.as_str()));
  el.push_attribute(("y", y.as_str()));
  el.push_attribute(("font-size", size.as_str()));
  if style.bold {
    el.push_attribute(("font-weight", "bold"));
  }
  el.push_attribute(("fill", style.fill));

  emit(w, Event::Start(el))?;
  emit(w, Event::Text(BytesText::new(text)))?;
  emit(w, Event::End(BytesEnd::new("text")))
}
