//! Payroll generation.
//!
//! A run turns the current employee directory into one immutable payroll
//! record per employee for a (month, year) period:
//!
//! * gross = grade salary + the element's five allowances
//! * net = gross - the element's five deductions
//!
//! Employees without a grade or an element are skipped and counted. All rows
//! of a run are written in a single transaction.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::model::{
    element::{Element, ElementAmounts},
    employee::Employee,
    grade::Grade,
    payroll::{NewPayroll, Period},
};
use crate::store::Repository;

/// Gross, deductions and net for one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayFigures {
    pub gross: Decimal,
    pub deductions: Decimal,
    pub net: Decimal,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RunSummary {
    #[schema(example = 12)]
    pub generated: u64,
    #[schema(example = 1)]
    pub skipped: u64,
}

pub fn compute_pay(salary: Decimal, amounts: &ElementAmounts) -> PayFigures {
    let gross = salary + amounts.total_allowances();
    let deductions = amounts.total_deductions();
    PayFigures {
        gross,
        deductions,
        net: gross - deductions,
    }
}

/// Builds the rows for a run. Returns the rows and the number of employees
/// that lacked a grade or element.
pub fn plan_run(
    employees: &[Employee],
    grades: &[Grade],
    elements: &[Element],
) -> (Vec<NewPayroll>, u64) {
    let grades: HashMap<u64, &Grade> = grades.iter().map(|g| (g.id, g)).collect();
    let elements: HashMap<u64, &Element> = elements.iter().map(|e| (e.id, e)).collect();

    let mut rows = Vec::with_capacity(employees.len());
    let mut skipped = 0;

    for employee in employees {
        let grade = employee.grade_id.and_then(|id| grades.get(&id));
        let element = employee.element_id.and_then(|id| elements.get(&id));

        let (Some(grade), Some(element)) = (grade, element) else {
            skipped += 1;
            continue;
        };

        let pay = compute_pay(grade.salary, &element.amounts);
        rows.push(NewPayroll {
            employee_id: employee.id,
            grade_id: grade.id,
            element_id: element.id,
            gross_salary: pay.gross,
            total_deductions: pay.deductions,
            net_pay: pay.net,
        });
    }

    (rows, skipped)
}

#[instrument(name = "generate_payroll", skip(store))]
pub async fn generate_payroll(
    store: &dyn Repository,
    month: &str,
    year: i32,
) -> AppResult<RunSummary> {
    let period = Period::new(month, year)?;

    let employees = store.list_employees().await?;
    let grades = store.list_grades().await?;
    let elements = store.list_elements().await?;

    let (rows, skipped) = plan_run(&employees, &grades, &elements);
    let generated = store.record_payroll_run(&period, &rows).await?;

    info!(period = %period, generated, skipped, "Payroll generated");

    Ok(RunSummary { generated, skipped })
}
