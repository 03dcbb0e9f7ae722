//! Export helpers for CSV and JSON artifacts.

pub mod polyline {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    use solar_core::constants::TAU;
    use solar_core::vector::Vector3;
    use solar_ephemeris::BodySystem;
    use solar_trajectory::{Trajectory, TrajectorySection};

    const HEADER: &str = "section,body,true_anomaly,x,y,z";
    const ASYMPTOTE_FRACTION: f64 = 0.95;

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// One sampled point of a section, in the section body's frame.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub section: usize,
        pub body: &'a str,
        pub true_anomaly: f64,
        pub position: Vector3,
    }

    impl Record<'_> {
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{},{:.6},{:.6},{:.6},{:.6}",
                self.section,
                self.body,
                self.true_anomaly,
                self.position[0],
                self.position[1],
                self.position[2],
            )
        }
    }

    /// Sample `resolution` points (at least two) along a section.
    ///
    /// Full orbits sweep the whole ellipse. Bounded arcs run from the entry to the
    /// exit true anomaly, going once around when the exit angle is the smaller one.
    /// Unbounded hyperbolas stop short of the asymptote.
    pub fn sample_section(section: &TrajectorySection, resolution: usize) -> Vec<(f64, Vector3)> {
        let resolution = resolution.max(2);
        let orbit = section.orbit();
        let (start, end) = match section.end_true_anomaly() {
            None if orbit.is_elliptic() => (0.0, TAU),
            None => {
                let start = section.start_true_anomaly();
                let asymptote = (-1.0 / orbit.eccentricity()).acos();
                (start, (ASYMPTOTE_FRACTION * asymptote).max(start))
            }
            Some(end) => {
                let start = section.start_true_anomaly();
                if end < start {
                    (start, end + TAU)
                } else {
                    (start, end)
                }
            }
        };

        let step = (end - start) / (resolution - 1) as f64;
        (0..resolution)
            .map(|i| {
                let true_anomaly = start + step * i as f64;
                (true_anomaly, orbit.sample_position(true_anomaly))
            })
            .collect()
    }

    /// Write the header and every sampled point of `trajectory`. Returns the row count.
    pub fn write_trajectory(
        writer: &mut dyn Write,
        system: &BodySystem,
        trajectory: &Trajectory,
        resolution: usize,
    ) -> io::Result<usize> {
        write_header(writer)?;
        let mut rows = 0;
        for (index, section) in trajectory.sections().enumerate() {
            let body = system.body(section.body()).name();
            for (true_anomaly, position) in sample_section(section, resolution) {
                Record {
                    section: index,
                    body,
                    true_anomaly,
                    position,
                }
                .write_to(writer)?;
                rows += 1;
            }
        }
        writer.flush()?;
        Ok(rows)
    }
}

pub mod summary {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    use solar_ephemeris::BodySystem;
    use solar_trajectory::Prediction;

    /// Per-section entry of the JSON sidecar. Unbounded values are written as `null`.
    #[derive(Debug, Clone, Serialize)]
    pub struct SectionSummary {
        pub index: usize,
        pub body: String,
        pub kind: &'static str,
        pub semi_major_axis: f64,
        pub eccentricity: f64,
        pub global_start: f64,
        pub start_t: f64,
        pub end_t: Option<f64>,
        pub duration: Option<f64>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct TrajectorySummary {
        pub scenario: String,
        pub epoch: f64,
        pub total_duration: Option<f64>,
        pub sections: Vec<SectionSummary>,
    }

    pub fn summarize(system: &BodySystem, scenario: &str, prediction: &Prediction) -> TrajectorySummary {
        let epochs = prediction.section_epochs();
        let sections = prediction
            .trajectory
            .sections()
            .zip(epochs)
            .enumerate()
            .map(|(index, (section, global_start))| {
                let orbit = section.orbit();
                SectionSummary {
                    index,
                    body: system.body(section.body()).name().to_string(),
                    kind: if orbit.is_elliptic() { "elliptic" } else { "hyperbolic" },
                    semi_major_axis: orbit.semi_major_axis(),
                    eccentricity: orbit.eccentricity(),
                    global_start,
                    start_t: section.start_t(),
                    end_t: section.end_t(),
                    duration: finite(section.duration()),
                }
            })
            .collect();

        TrajectorySummary {
            scenario: scenario.to_string(),
            epoch: prediction.epoch,
            total_duration: finite(prediction.trajectory.total_duration()),
            sections,
        }
    }

    /// Write the summary as pretty JSON, creating parent directories as needed.
    pub fn write_summary(path: &Path, summary: &TrajectorySummary) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        to_writer_pretty(file, summary).map_err(io::Error::other)
    }

    fn finite(value: f64) -> Option<f64> {
        value.is_finite().then_some(value)
    }
}
