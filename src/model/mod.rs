pub mod department;
pub mod element;
pub mod employee;
pub mod grade;
pub mod job;
pub mod payroll;
pub mod role;
pub mod user;
