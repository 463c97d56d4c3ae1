//! Utility modules compiled into the hub

pub mod converter;
pub mod files;
pub mod text;

use crate::hub::function::UtilityModule;

pub fn modules() -> Vec<UtilityModule> {
    vec![converter::module(), files::module(), text::module()]
}
