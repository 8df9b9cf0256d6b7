pub mod date_input;
pub mod form;
pub mod picker;
pub mod popup;
pub mod selection;
