// Pattern-driven signals read from raw resume text. Each detector is an ordered
// chain of independent attempts that stops at the first hit.

pub mod education;
pub mod experience;
pub mod title;
