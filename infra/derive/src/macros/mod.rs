pub mod with_features;
