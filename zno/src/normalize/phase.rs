use std::fmt;

use crate::types::Table;

/// One full pass over the source data materializing one destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    RegisterLocations,
    EducationInstitutions,
    TestCenters,
    Participants,
    TestResults,
}

impl Phase {
    /// Phases in the only order satisfying every foreign key.
    pub const ORDER: [Phase; 5] = [
        Phase::RegisterLocations,
        Phase::EducationInstitutions,
        Phase::TestCenters,
        Phase::Participants,
        Phase::TestResults,
    ];

    pub fn table(&self) -> Table {
        match self {
            Phase::RegisterLocations => Table::RegisterLocations,
            Phase::EducationInstitutions => Table::EducationInstitutions,
            Phase::TestCenters => Table::TestCenters,
            Phase::Participants => Table::Participants,
            Phase::TestResults => Table::TestResults,
        }
    }

    pub fn as_static_str(&self) -> &'static str {
        match self {
            Phase::RegisterLocations => "register_locations",
            Phase::EducationInstitutions => "education_institutions",
            Phase::TestCenters => "test_centers",
            Phase::Participants => "participants",
            Phase::TestResults => "test_results",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_static_str())
    }
}

/// Outcome of one committed phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    /// Source records scanned by the phase.
    pub records_scanned: usize,
    /// Rows committed to the destination.
    pub rows_written: usize,
    /// Records repeating a natural key already seen in the phase. Lookup phases only.
    pub records_deduplicated: usize,
    /// Records excluded because a reference did not resolve. Participant and test result
    /// phases only.
    pub records_skipped: usize,
}

impl fmt::Display for PhaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} scanned, {} written, {} deduplicated, {} skipped",
            self.phase,
            self.records_scanned,
            self.rows_written,
            self.records_deduplicated,
            self.records_skipped
        )
    }
}
