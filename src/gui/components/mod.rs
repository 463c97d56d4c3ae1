pub mod console;
pub mod message;
pub mod param_form;
pub mod path_field;
