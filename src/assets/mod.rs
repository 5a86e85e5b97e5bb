/// Font loading and banner text layout.
pub mod text;
