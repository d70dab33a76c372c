pub mod rules;

pub use rules::recommend;
