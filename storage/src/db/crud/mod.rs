pub mod composition;
pub mod disc;
pub mod track;
