//! Paints laid-out report pages into a PDF with `printpdf`.

use printpdf::{
    path::{PaintMode, WindingOrder},
    BuiltinFont, Color, Greyscale, IndirectFontRef, Line as PdfLine, Mm, PdfDocument,
    PdfLayerReference, Point, Polygon,
};
use tracing::debug;

use crate::errors::AppError;
use crate::report::font_metrics::FontStyle;
use crate::report::layout::{layout_report, DrawOp, PageOps, PAGE_HEIGHT, PAGE_WIDTH};
use crate::report::markup::to_pdf_safe;
use crate::report::ReportSections;

const LAYER_NAME: &str = "Report";

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        }
    }
}

/// Lays out and renders the report, returning the PDF file bytes.
pub fn render_report(sections: &ReportSections) -> Result<Vec<u8>, AppError> {
    let pages = layout_report(sections);
    let title = format!("{} Ogilvy Report", to_pdf_safe(sections.domain.trim()));
    debug!(pages = pages.len(), "Painting PDF report");
    paint(&pages, &title)
}

fn paint(pages: &[PageOps], title: &str) -> Result<Vec<u8>, AppError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER_NAME);

    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?,
    };

    for (i, ops) in pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER_NAME);
            doc.get_page(page).get_layer(layer)
        };
        layer.set_fill_color(grey(0.0));
        for op in ops {
            paint_op(&layer, op, &fonts);
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn paint_op(layer: &PdfLayerReference, op: &DrawOp, fonts: &Fonts) {
    match op {
        DrawOp::Text {
            x,
            baseline,
            size,
            style,
            text,
        } => {
            layer.use_text(text.as_str(), *size, mm(*x), mm(*baseline), fonts.get(*style));
        }
        DrawOp::FillRect {
            x,
            y,
            width,
            height,
            grey: shade,
        } => {
            let ring = vec![
                (Point::new(mm(*x), mm(*y)), false),
                (Point::new(mm(x + width), mm(*y)), false),
                (Point::new(mm(x + width), mm(y + height)), false),
                (Point::new(mm(*x), mm(y + height)), false),
            ];
            layer.set_fill_color(grey(*shade));
            layer.add_polygon(Polygon {
                rings: vec![ring],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
            // Text is painted with the fill colour.
            layer.set_fill_color(grey(0.0));
        }
        DrawOp::Stroke {
            from,
            to,
            thickness,
            grey: shade,
        } => {
            layer.set_outline_color(grey(*shade));
            layer.set_outline_thickness(*thickness);
            layer.add_line(PdfLine {
                points: vec![
                    (Point::new(mm(from.0), mm(from.1)), false),
                    (Point::new(mm(to.0), mm(to.1)), false),
                ],
                is_closed: false,
            });
        }
    }
}

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn grey(level: f32) -> Color {
    Color::Greyscale(Greyscale::new(level, None))
}

fn pdf_error(e: printpdf::Error) -> AppError {
    AppError::Pdf(e.to_string())
}
