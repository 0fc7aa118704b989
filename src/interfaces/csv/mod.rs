pub mod pay_period_writer;
pub mod spend_reader;
