mod manifest;

pub use manifest::SolutionManifest;
