pub mod engine;
pub mod payslip;
