//! SVG plots and the HTML dashboard page.
//!
//! Two views of one dataset: the raw points joined in file order, and the
//! angle-sorted outline closed back to its first vertex and filled.

use std::fmt::Write;

use polysort::api::{
    centroid, has_crossing_edges, polygon_sort, signed_area, Point, PolygonError,
};

use crate::loader::{Dataset, Table};

const PLOT_W: f64 = 480.0;
const PLOT_H: f64 = 360.0;
const MARGIN: f64 = 40.0;
/// Above this many vertices the O(n²) self-crossing check is skipped.
const CROSSING_CHECK_MAX: usize = 2_000;

/// Message shown instead of plots when an upload cannot be decoded.
pub const PARSE_FAILURE: &str = "There was an error processing this file.";

#[derive(Clone, Copy, Debug, Default)]
pub struct PlotStyle<'a> {
    pub title: &'a str,
    /// `points` is a closed ring: the last entry repeats the first and gets no marker.
    pub closed: bool,
    pub fill: bool,
}

/// What the dashboard should show.
pub enum View<'a> {
    Empty,
    Loaded(&'a Dataset),
    Failed { name: &'a str, message: String },
}

/// Escape text for HTML element and attribute content.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

struct Frame {
    min: Point,
    span: Point,
}

impl Frame {
    fn fit(points: &[Point]) -> Frame {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min = min.inf(p);
            max = max.sup(p);
        }
        if points.is_empty() {
            return Frame {
                min: Point::zeros(),
                span: Point::new(1.0, 1.0),
            };
        }
        // flat extents still get a unit-wide axis
        let span = (max - min).map(|s| if s > 0.0 { s } else { 1.0 });
        Frame { min, span }
    }

    fn to_px(&self, p: Point) -> (f64, f64) {
        let u = (p - self.min).component_div(&self.span);
        (
            MARGIN + u.x * (PLOT_W - 2.0 * MARGIN),
            PLOT_H - MARGIN - u.y * (PLOT_H - 2.0 * MARGIN),
        )
    }
}

/// Markers joined by segments, each labelled with its position in `points`.
pub fn svg_plot(points: &[Point], style: PlotStyle<'_>) -> String {
    let frame = Frame::fit(points);
    let mut svg = String::new();
    // fmt::Write into a String cannot fail
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="100%" role="img"><title>{t}</title>"#,
        w = PLOT_W,
        h = PLOT_H,
        t = escape(style.title),
    );
    let _ = write!(
        svg,
        r##"<rect x="{m}" y="{m}" width="{iw}" height="{ih}" fill="none" stroke="#ccc"/>"##,
        m = MARGIN,
        iw = PLOT_W - 2.0 * MARGIN,
        ih = PLOT_H - 2.0 * MARGIN,
    );
    let max = frame.min + frame.span;
    let _ = write!(
        svg,
        r##"<g font-size="10" fill="#666"><text x="{m}" y="{yb}">{x0:.3}</text><text x="{xr}" y="{yb}" text-anchor="end">{x1:.3}</text><text x="4" y="{yl}">{y0:.3}</text><text x="4" y="{yt}">{y1:.3}</text></g>"##,
        m = MARGIN,
        yb = PLOT_H - MARGIN + 14.0,
        xr = PLOT_W - MARGIN,
        yl = PLOT_H - MARGIN,
        yt = MARGIN + 4.0,
        x0 = frame.min.x,
        x1 = max.x,
        y0 = frame.min.y,
        y1 = max.y,
    );

    if !points.is_empty() {
        let mut path = String::new();
        for (i, p) in points.iter().enumerate() {
            let (x, y) = frame.to_px(*p);
            let _ = write!(path, "{}{:.2},{:.2} ", if i == 0 { 'M' } else { 'L' }, x, y);
        }
        let fill = if style.fill { "rgba(31,119,180,0.25)" } else { "none" };
        let _ = write!(
            svg,
            r##"<path d="{}" fill="{}" stroke="#1f77b4" stroke-width="2"/>"##,
            path.trim_end(),
            fill
        );
        let marked = if style.closed && points.len() > 1 {
            &points[..points.len() - 1]
        } else {
            points
        };
        for (i, p) in marked.iter().enumerate() {
            let (x, y) = frame.to_px(*p);
            let _ = write!(
                svg,
                r##"<circle cx="{x:.2}" cy="{y:.2}" r="4" fill="#1f77b4"><title>{i}: ({px}, {py})</title></circle><text x="{lx:.2}" y="{ly:.2}" font-size="10">{i}</text>"##,
                px = p.x,
                py = p.y,
                lx = x + 6.0,
                ly = y - 6.0,
            );
        }
    }
    svg.push_str("</svg>");
    svg
}

pub fn table_html(table: &Table) -> String {
    let mut html = String::from("<table><thead><tr>");
    for c in &table.columns {
        let _ = write!(html, "<th>{}</th>", escape(c));
    }
    html.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape(&cell.to_string()));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn summary_html(ds: &Dataset, outline: &[Point]) -> Result<String, PolygonError> {
    let c = centroid(ds.points.as_slice())?;
    let crossing = if outline.len() > CROSSING_CHECK_MAX {
        "not checked"
    } else if has_crossing_edges(outline) {
        "yes"
    } else {
        "no"
    };
    let modified = ds
        .modified
        .map(|t| format!("<h6>{}</h6>", t.format("%Y-%m-%d %H:%M:%S UTC")))
        .unwrap_or_default();
    Ok(format!(
        "<h5>{name}</h5>{modified}<ul><li>points: {n}</li><li>centroid: ({cx:.4}, {cy:.4})</li><li>outline area: {area:.4}</li><li>outline self-crosses: {crossing}</li></ul>",
        name = escape(&ds.name),
        n = ds.points.len(),
        cx = c.x,
        cy = c.y,
        area = signed_area(outline).abs(),
    ))
}

const UPLOAD_BOX: &str = r##"<div id="upload-data" style="width:100%;height:60px;line-height:60px;border:1px dashed;border-radius:5px;text-align:center;margin:10px">
<label>Drag and Drop or <a href="#" onclick="document.getElementById('file').click();return false;">Select Files</a></label>
<input type="file" id="file" accept=".csv,.xls,.xlsx,.json" hidden>
</div>
<script>
async function send(file) {
  const r = await fetch('/upload?filename=' + encodeURIComponent(file.name) + '&last_modified=' + file.lastModified, {method: 'POST', body: file});
  const html = await r.text();
  document.open(); document.write(html); document.close();
}
const box = document.getElementById('upload-data');
document.getElementById('file').addEventListener('change', e => { if (e.target.files.length) send(e.target.files[0]); });
box.addEventListener('dragover', e => e.preventDefault());
box.addEventListener('drop', e => { e.preventDefault(); if (e.dataTransfer.files.length) send(e.dataTransfer.files[0]); });
</script>"##;

/// Full dashboard page. `interactive` adds the upload box (served pages only).
pub fn dashboard_page(title: &str, view: View<'_>, interactive: bool) -> Result<String, PolygonError> {
    let mut body = String::new();
    if interactive {
        body.push_str(UPLOAD_BOX);
    }
    match view {
        View::Empty => {
            body.push_str("<p>No dataset loaded yet. Upload a CSV, Excel or JSON file of x, y points.</p>");
        }
        View::Failed { name, message } => {
            let _ = write!(
                body,
                r#"<div id="output-data-upload"><h5>{}</h5><p>{}</p><pre>{}</pre></div>"#,
                escape(name),
                PARSE_FAILURE,
                escape(&message)
            );
        }
        View::Loaded(ds) => {
            let sorted = polygon_sort(&ds.points)?;
            let raw = svg_plot(
                ds.points.as_slice(),
                PlotStyle {
                    title: "raw points (file order)",
                    ..PlotStyle::default()
                },
            );
            let outline = svg_plot(
                &sorted.closed_loop(),
                PlotStyle {
                    title: "sorted polygon",
                    closed: true,
                    fill: true,
                },
            );
            let _ = write!(
                body,
                r#"<div id="raw-polygon-graph" style="display:inline-block;width:49%">{raw}</div><div id="sorted-polygon-graph" style="display:inline-block;width:49%;padding:0 20px">{outline}</div><div id="output-data-upload">{summary}{table}</div>"#,
                summary = summary_html(ds, sorted.as_slice())?,
                table = table_html(&ds.table),
            );
        }
    }
    Ok(format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>{t}</title><style>body{{font-family:sans-serif;margin:20px}}table{{border-collapse:collapse}}td,th{{border:1px solid #ddd;padding:2px 8px}}</style></head><body><h3>{t}</h3>{body}</body></html>"#,
        t = escape(title),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Dataset;

    fn square() -> Dataset {
        Dataset::from_bytes("square.json", b"[[-1,-1],[1,1],[-1,1],[1,-1]]").unwrap()
    }

    #[test]
    fn escape_markup() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn closed_ring_returns_to_start_without_extra_marker() {
        let ring = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
        ];
        let closed = svg_plot(&ring, PlotStyle { title: "t", closed: true, fill: true });
        // M + three L segments, the last one back to the start
        assert_eq!(closed.matches(" L").count(), 3);
        assert!(closed.contains("rgba("));
        assert_eq!(closed.matches("<circle").count(), 3);
        let open = svg_plot(&ring[..3], PlotStyle { title: "t", ..PlotStyle::default() });
        assert_eq!(open.matches(" L").count(), 2);
        assert_eq!(open.matches("<circle").count(), 3);
    }

    #[test]
    fn sorted_plot_draws_closed_loop_of_sorted_points() {
        let ds = square();
        let html = dashboard_page("Polygons", View::Loaded(&ds), false).unwrap();
        let start = html.find("sorted-polygon-graph").unwrap();
        let sorted_svg = &html[start..];
        let path_start = sorted_svg.find("<path d=\"").unwrap() + "<path d=\"".len();
        let d = &sorted_svg[path_start..path_start + sorted_svg[path_start..].find('"').unwrap()];
        let coords: Vec<&str> = d.split_whitespace().collect();
        assert_eq!(coords.len(), 5);
        assert_eq!(coords[0][1..], coords[4][1..]);
    }

    #[test]
    fn summary_shows_last_modified_when_known() {
        let when = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let ds = square().with_modified(Some(when));
        let html = dashboard_page("Polygons", View::Loaded(&ds), false).unwrap();
        assert!(html.contains("<h6>2023-11-14 22:13:20 UTC</h6>"));
        let html = dashboard_page("Polygons", View::Loaded(&square()), false).unwrap();
        assert!(!html.contains("<h6>"));
    }

    #[test]
    fn degenerate_extent_does_not_produce_nan() {
        let svg = svg_plot(&[Point::new(5.0, 5.0)], PlotStyle::default());
        assert!(!svg.contains("NaN"));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn loaded_page_has_both_plots_and_table() {
        let ds = square();
        let html = dashboard_page("Polygons", View::Loaded(&ds), true).unwrap();
        assert!(html.contains("raw-polygon-graph"));
        assert!(html.contains("sorted-polygon-graph"));
        assert!(html.contains("<td>-1</td>"));
        assert!(html.contains("outline self-crosses: no"));
        assert!(html.contains("outline area: 4.0000"));
        assert!(html.contains("upload-data"));
    }

    #[test]
    fn failed_page_shows_message_without_plots() {
        let html = dashboard_page(
            "Polygons",
            View::Failed {
                name: "bad.csv",
                message: "row 0 column 0 is not a finite number".to_string(),
            },
            false,
        )
        .unwrap();
        assert!(html.contains(PARSE_FAILURE));
        assert!(!html.contains("<svg"));
        assert!(!html.contains("upload-data"));
    }
}
