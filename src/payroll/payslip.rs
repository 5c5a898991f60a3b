//! Payslip rendering: one payroll record laid out as a single A4 PDF page.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::model::payroll::PayrollRecord;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT: f32 = 20.0;
const VALUE_COLUMN: f32 = 90.0;
const LINE_HEIGHT: f32 = 9.0;

/// Figures printed on a payslip, each already fixed to two decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payslip {
    pub employee_name: String,
    pub employee_id: u64,
    pub period: String,
    /// Display figure only: gross minus deductions, as on the historical
    /// payslip layout. It is not the grade salary.
    pub basic_salary: String,
    pub gross_salary: String,
    pub total_deductions: String,
    pub net_pay: String,
    month: String,
    year: i32,
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

impl From<&PayrollRecord> for Payslip {
    fn from(record: &PayrollRecord) -> Self {
        Payslip {
            employee_name: format!("{} {}", record.first_name, record.surname),
            employee_id: record.employee_id,
            period: record.period_label(),
            basic_salary: money(record.gross_salary - record.total_deductions),
            gross_salary: money(record.gross_salary),
            total_deductions: money(record.total_deductions),
            net_pay: money(record.net_pay),
            month: record.month.clone(),
            year: record.year,
        }
    }
}

impl Payslip {
    pub fn file_name(&self) -> String {
        format!("payslip_{}_{}.pdf", self.month, self.year)
    }

    /// Label/value rows in print order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Employee", self.employee_name.clone()),
            ("Employee ID", self.employee_id.to_string()),
            ("Period", self.period.clone()),
            ("Basic Salary", self.basic_salary.clone()),
            ("Gross Salary", self.gross_salary.clone()),
            ("Total Deductions", self.total_deductions.clone()),
            ("Net Pay", self.net_pay.clone()),
        ]
    }

    pub fn render_pdf(&self) -> AppResult<Vec<u8>> {
        let title = format!("Payslip {}", self.period);
        let (doc, page, layer) =
            PdfDocument::new(title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Payslip");

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        let layer = doc.get_page(page).get_layer(layer);
        let mut y = PAGE_HEIGHT - 30.0;

        layer.use_text("Payslip", 20.0, Mm(LEFT), Mm(y), &bold);
        y -= LINE_HEIGHT * 2.0;

        for (label, value) in self.rows() {
            write_row(&layer, label, &value, y, &bold, &regular);
            y -= LINE_HEIGHT;
        }

        doc.save_to_bytes().map_err(pdf_error)
    }
}

fn write_row(
    layer: &PdfLayerReference,
    label: &str,
    value: &str,
    y: f32,
    label_font: &IndirectFontRef,
    value_font: &IndirectFontRef,
) {
    layer.use_text(label, 12.0, Mm(LEFT), Mm(y), label_font);
    layer.use_text(value, 12.0, Mm(VALUE_COLUMN), Mm(y), value_font);
}

fn pdf_error(e: printpdf::Error) -> AppError {
    AppError::internal(format!("failed to render payslip: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::d;

    fn record() -> PayrollRecord {
        PayrollRecord {
            id: 7,
            employee_id: 1001,
            first_name: "John".into(),
            surname: "Doe".into(),
            grade_id: 1,
            element_id: 1,
            month: "January".into(),
            year: 2026,
            gross_salary: d("5450"),
            total_deductions: d("350.5"),
            net_pay: d("5099.5"),
        }
    }

    #[test]
    fn test_amounts_are_fixed_to_two_decimals() {
        let slip = Payslip::from(&record());
        assert_eq!(slip.gross_salary, "5450.00");
        assert_eq!(slip.total_deductions, "350.50");
        assert_eq!(slip.net_pay, "5099.50");
    }

    #[test]
    fn test_basic_salary_is_gross_minus_deductions() {
        let slip = Payslip::from(&record());
        assert_eq!(slip.basic_salary, "5099.50");
    }

    #[test]
    fn test_header_fields_and_file_name() {
        let slip = Payslip::from(&record());
        assert_eq!(slip.employee_name, "John Doe");
        assert_eq!(slip.period, "January 2026");
        assert_eq!(slip.file_name(), "payslip_January_2026.pdf");

        let labels: Vec<_> = slip.rows().into_iter().map(|(label, _)| label).collect();
        assert_eq!(
            labels,
            [
                "Employee",
                "Employee ID",
                "Period",
                "Basic Salary",
                "Gross Salary",
                "Total Deductions",
                "Net Pay"
            ]
        );
    }

    #[test]
    fn test_render_produces_a_pdf_document() {
        let bytes = Payslip::from(&record()).render_pdf().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
