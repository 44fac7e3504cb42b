use crate::scale::{ConfigError, ReviewScale, ScaleSpec};

/// Per-reviewable-type configuration, immutable after `build`.
///
/// Built once per type and passed by reference into every engine call;
/// there is no process-wide registry.
#[derive(Debug, Clone)]
pub struct ReviewableConfig {
    scale: ReviewScale,
    accept_ip: bool,
    reviewer_types: Vec<String>,
    extra_fields: Vec<String>,
}

impl ReviewableConfig {
    pub fn builder() -> ReviewableConfigBuilder {
        ReviewableConfigBuilder::default()
    }

    /// The rating scale for this reviewable type.
    pub fn scale(&self) -> &ReviewScale {
        &self.scale
    }

    /// Whether bare IP addresses may review.
    pub fn accept_ip(&self) -> bool {
        self.accept_ip
    }

    /// Entity types allowed as reviewers; empty means any.
    pub fn reviewer_types(&self) -> &[String] {
        &self.reviewer_types
    }

    /// Extra review attributes the target schema recognizes. Resolved here,
    /// once, rather than by runtime reflection on each call.
    pub fn extra_fields(&self) -> &[String] {
        &self.extra_fields
    }
}

impl Default for ReviewableConfig {
    /// Whole-star 1..=5 scale, IP reviewing disabled, any reviewer type.
    fn default() -> Self {
        ReviewableConfig {
            scale: ReviewScale::default(),
            accept_ip: false,
            reviewer_types: Vec::new(),
            extra_fields: Vec::new(),
        }
    }
}

/// Builder for [`ReviewableConfig`].
#[derive(Debug, Default)]
pub struct ReviewableConfigBuilder {
    spec: Option<ScaleSpec>,
    precision: Option<i64>,
    accept_ip: bool,
    reviewer_types: Vec<String>,
    extra_fields: Vec<String>,
}

impl ReviewableConfigBuilder {
    /// Declare the rating scale (defaults to whole stars 1..=5).
    pub fn scale(mut self, spec: ScaleSpec) -> Self {
        self.spec = Some(spec);
        self
    }

    /// Override the precision averages are rounded to.
    pub fn precision(mut self, precision: i64) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Allow (or forbid) reviews identified by bare IP address.
    pub fn accept_ip(mut self, accept: bool) -> Self {
        self.accept_ip = accept;
        self
    }

    /// Restrict reviewers to the given entity type.
    pub fn reviewed_by(mut self, entity_type: impl Into<String>) -> Self {
        self.reviewer_types.push(entity_type.into());
        self
    }

    /// Permit an extra review attribute (e.g. "title").
    pub fn extra_field(mut self, field: impl Into<String>) -> Self {
        self.extra_fields.push(field.into());
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<ReviewableConfig, ConfigError> {
        let scale = match self.spec {
            Some(spec) => ReviewScale::build(spec, self.precision)?,
            None => match self.precision {
                Some(p) if p < 0 => return Err(ConfigError::InvalidPrecision { given: p }),
                Some(_) => ReviewScale::build(ScaleSpec::range(1.0, 5.0), self.precision)?,
                None => ReviewScale::default(),
            },
        };
        Ok(ReviewableConfig {
            scale,
            accept_ip: self.accept_ip,
            reviewer_types: self.reviewer_types,
            extra_fields: self.extra_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_plain_config() {
        let built = ReviewableConfig::builder().build().unwrap();
        let plain = ReviewableConfig::default();
        assert_eq!(built.scale(), plain.scale());
        assert!(!built.accept_ip());
        assert!(built.reviewer_types().is_empty());
        assert!(built.extra_fields().is_empty());
    }

    #[test]
    fn builder_collects_reviewer_types_and_fields() {
        let config = ReviewableConfig::builder()
            .reviewed_by("User")
            .reviewed_by("Account")
            .extra_field("title")
            .accept_ip(true)
            .build()
            .unwrap();
        assert_eq!(config.reviewer_types(), &["User", "Account"]);
        assert_eq!(config.extra_fields(), &["title"]);
        assert!(config.accept_ip());
    }

    #[test]
    fn precision_override_applies_to_default_scale() {
        let config = ReviewableConfig::builder().precision(2).build().unwrap();
        assert_eq!(config.scale().precision(), 2);
        assert_eq!(config.scale().values(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn invalid_scale_fails_build() {
        let result = ReviewableConfig::builder()
            .scale(ScaleSpec::values([]))
            .build();
        assert!(result.is_err());
    }
}
