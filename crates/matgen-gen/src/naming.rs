//! Output artifact naming

use matgen_asset::paths;

use crate::config::GenerationConfig;

/// Builds `{prefix}{stem}{suffix}.{extension}` with prefix and suffix sanitized once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNamer {
    prefix: String,
    suffix: String,
    extension: String,
}

impl OutputNamer {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            prefix: paths::sanitize_file_name(&config.name_prefix),
            suffix: paths::sanitize_file_name(&config.name_suffix),
            extension: config.artifact_extension.clone(),
        }
    }

    pub fn file_name(&self, stem: &str) -> String {
        format!("{}{}{}.{}", self.prefix, stem, self.suffix, self.extension)
    }

    /// Full store path inside `output_folder`
    pub fn output_path(&self, output_folder: &str, stem: &str) -> String {
        paths::join(output_folder, &self.file_name(stem))
    }
}
