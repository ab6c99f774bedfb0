pub mod expense_reader;
