pub mod history_entry;
pub mod history_exporter;
pub mod history_log;
