//! Integration tests for br-output.

#[cfg(test)]
mod helpers {
    use br_eval::Objectives;
    use br_search::{Candidate, Population};

    /// Population with explicit objectives and ranks.
    pub fn population(entries: &[(Objectives, usize)]) -> Population {
        Population::new(
            entries
                .iter()
                .map(|&(o, rank)| Candidate {
                    decision:   vec![true, false],
                    objectives: Some(o),
                    rank,
                    crowding:   f64::INFINITY,
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::{CsvWriter, PARETO_FILE, SUMMARY_FILE};
    use crate::row::{GenerationSummaryRow, ParetoRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read_rows(path: std::path::PathBuf) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join(PARETO_FILE).exists());
        assert!(dir.path().join(SUMMARY_FILE).exists());
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = tmp();
        let nested = dir.path().join("a").join("b");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join(PARETO_FILE).exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(PARETO_FILE)).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["Cost", "AverageEIPW", "DifferenceEIPW"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join(SUMMARY_FILE)).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers2,
            ["generation", "population", "front0", "min_cost", "best_average_eipw", "min_difference_eipw"]
        );
    }

    #[test]
    fn front_rows_written_in_order() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_front(&[
            ParetoRow { cost: 0.0, average_eipw: 0.25, difference_eipw: 1.5 },
            ParetoRow { cost: 120.0, average_eipw: 1.0, difference_eipw: 0.0 },
        ])
        .unwrap();
        w.finish().unwrap();

        let rows = read_rows(dir.path().join(PARETO_FILE));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "0.25");
        assert_eq!(&rows[0][2], "1.5");
        assert_eq!(&rows[1][0], "120");
        assert_eq!(rows[1][1].parse::<f64>().unwrap(), 1.0);
    }

    #[test]
    fn zero_cost_written_without_sign() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let objectives = br_eval::Objectives::new(0.0, -0.5, 0.0);
        w.write_front(&[ParetoRow::from(&objectives)]).unwrap();
        w.finish().unwrap();

        let rows = read_rows(dir.path().join(PARETO_FILE));
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[0][1], "0.5");
    }

    #[test]
    fn summary_row_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_generation_summary(&GenerationSummaryRow {
            generation:          4,
            population:          20,
            front0:              7,
            min_cost:            35.5,
            best_average_eipw:   0.9,
            min_difference_eipw: 0.125,
        })
        .unwrap();
        w.finish().unwrap();

        let rows = read_rows(dir.path().join(SUMMARY_FILE));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "4");
        assert_eq!(&rows[0][2], "7");
        assert_eq!(&rows[0][3], "35.5");
    }

    #[test]
    fn rerun_overwrites_previous_output() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_front(&[ParetoRow { cost: 1.0, average_eipw: 1.0, difference_eipw: 0.0 }]).unwrap();
        w.finish().unwrap();

        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(read_rows(dir.path().join(PARETO_FILE)).is_empty());
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use br_eval::Objectives;
    use br_search::SearchObserver;
    use tempfile::TempDir;

    use super::helpers::population;
    use crate::csv::{CsvWriter, PARETO_FILE, SUMMARY_FILE};
    use crate::observer::{summarize, SearchOutputObserver};
    use crate::row::{GenerationSummaryRow, ParetoRow};
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult};

    #[test]
    fn summarize_takes_per_objective_bests() {
        let pop = population(&[
            (Objectives::new(10.0, -0.4, 2.0), 0),
            (Objectives::new(30.0, -0.9, 0.5), 0),
            (Objectives::new(40.0, -0.8, 3.0), 1),
        ]);
        let row = summarize(2, &pop);
        assert_eq!(row.generation, 2);
        assert_eq!(row.population, 3);
        assert_eq!(row.front0, 2);
        assert_eq!(row.min_cost, 10.0);
        assert_eq!(row.best_average_eipw, 0.9);
        assert_eq!(row.min_difference_eipw, 0.5);
    }

    #[test]
    fn observer_writes_summaries_and_front() {
        let dir = TempDir::new().unwrap();
        let mut obs = SearchOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        let pop = population(&[
            (Objectives::new(0.0, -0.5, 1.0), 0),
            (Objectives::new(50.0, -1.0, 0.0), 0),
        ]);
        obs.on_generation_start(0);
        obs.on_generation_end(0, &pop);
        obs.on_generation_end(1, &pop);
        obs.on_search_end(&pop);
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join(SUMMARY_FILE)).unwrap();
        assert_eq!(rdr.records().count(), 2);

        let mut rdr = csv::Reader::from_path(dir.path().join(PARETO_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        // connectivity is written with its sign restored
        assert_eq!(&rows[0][1], "0.5");
        assert_eq!(&rows[1][0], "50");
    }

    /// Writer whose every call fails.
    struct BrokenWriter {
        calls: usize,
    }

    impl OutputWriter for BrokenWriter {
        fn write_front(&mut self, _: &[ParetoRow]) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(std::io::Error::other("front")))
        }
        fn write_generation_summary(&mut self, _: &GenerationSummaryRow) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(std::io::Error::other("summary")))
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(std::io::Error::other("finish")))
        }
    }

    #[test]
    fn first_error_is_kept() {
        let mut obs = SearchOutputObserver::new(BrokenWriter { calls: 0 });
        let pop = population(&[(Objectives::new(1.0, -1.0, 0.0), 0)]);
        obs.on_generation_end(0, &pop);
        obs.on_search_end(&pop);

        let err = obs.take_error().unwrap();
        assert_eq!(err.to_string(), "I/O error: summary");
        assert!(obs.take_error().is_none());
        assert_eq!(obs.into_writer().calls, 3);
    }
}
