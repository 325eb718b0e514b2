/// How much detail each successfully polled cluster gets in the report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReportDetail {
    /// Cores, RAM, hostname and version per node.
    #[default]
    Brief,
    /// Every field of `/pools` and `/pools/default`, plus a per-cluster version histogram.
    Full,
}

/// Serialization of the finished report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Json,
    /// Tab separated, one line per node. Only defined for brief reports.
    Tabular,
}

/// Validated combination of report detail and format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    detail: ReportDetail,
    format: ReportFormat,
}

impl ReportOptions {
    /// Returns `None` for a full tabular report, which does not exist.
    pub fn new(detail: ReportDetail, format: ReportFormat) -> Option<Self> {
        match (detail, format) {
            (ReportDetail::Full, ReportFormat::Tabular) => None,
            _ => Some(Self { detail, format }),
        }
    }

    pub fn from_flags(full: bool, tabular: bool) -> Option<Self> {
        let detail = if full {
            ReportDetail::Full
        } else {
            ReportDetail::Brief
        };
        let format = if tabular {
            ReportFormat::Tabular
        } else {
            ReportFormat::Json
        };
        Self::new(detail, format)
    }
}

// Getters
impl ReportOptions {
    pub fn detail(&self) -> ReportDetail {
        self.detail
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }
}
