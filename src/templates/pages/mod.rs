pub mod announcements;
pub mod appointments;
pub mod blotter;
pub mod cases;
pub mod dashboard;
pub mod login;
pub mod programs;

pub use announcements::{announcements_page, announcements_table};
pub use appointments::{appointments_page, appointments_table};
pub use blotter::{blotter_page, blotter_table};
pub use cases::{cases_page, cases_table};
pub use dashboard::{dashboard_page, DashboardVm};
pub use login::login_page;
pub use programs::{program_detail_page, programs_page, programs_table};
