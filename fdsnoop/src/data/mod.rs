pub mod descriptor;
pub mod fdinfo;
pub mod flags;
