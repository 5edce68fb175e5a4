pub mod csv_history_exporter;
