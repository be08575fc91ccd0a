pub mod face_matcher;
pub mod face_verdict;
pub mod reference_store;
