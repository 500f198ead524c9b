// Interface adapters: replay script input, report output and their wire DTOs.

pub mod protocol;
pub mod report;
pub mod script;
