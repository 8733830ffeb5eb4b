pub mod image_io;
pub mod ledger_file;
pub mod manifest;
