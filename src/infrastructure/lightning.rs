use crate::core::interfaces::CssPostProcessor;
use crate::utils::{Logger, Result, SassModulesError};
use lightningcss::{
    printer::PrinterOptions,
    stylesheet::{ParserOptions as CssParserOptions, StyleSheet},
};
use std::path::Path;

/// Post-processor that reprints compiled CSS through LightningCSS
pub struct LightningCssProcessor {
    minify: bool,
}

impl LightningCssProcessor {
    pub fn new(minify: bool) -> Self {
        Self { minify }
    }

    fn print(&self, css: &str) -> Result<String> {
        let stylesheet = StyleSheet::parse(css, CssParserOptions::default())
            .map_err(|e| SassModulesError::Processor(format!("parse failed: {}", e)))?;
        stylesheet
            .to_css(PrinterOptions {
                minify: self.minify,
                ..Default::default()
            })
            .map(|result| result.code)
            .map_err(|e| SassModulesError::Processor(format!("print failed: {}", e)))
    }
}

#[async_trait::async_trait]
impl CssPostProcessor for LightningCssProcessor {
    async fn process(&self, css: String, path: &Path) -> Result<String> {
        let _timer = crate::utils::Timer::start(&format!(
            "Post-processing CSS {}",
            path.file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
        ));

        match self.print(&css) {
            Ok(printed) => Ok(printed),
            Err(e) => {
                Logger::warn(&format!(
                    "{} in {}, keeping compiler output",
                    e,
                    path.display()
                ));
                Ok(css)
            }
        }
    }
}
