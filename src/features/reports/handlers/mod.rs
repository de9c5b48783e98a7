pub mod report_handler;

pub use report_handler::{
    __path_create_report, __path_list_reports, __path_resolve_report, create_report,
    list_reports, resolve_report, ReportState,
};
