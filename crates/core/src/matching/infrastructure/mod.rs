pub mod cosine_matcher;
