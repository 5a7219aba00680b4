//! Single-threaded driver for a `RecordStage` chain.
//!
//! Rows are handed to the chain one by one; a row reaches the end of the
//! chain (or is dropped) before the next row is looked at.

use age_pipeline::RawRecord;

use crate::record_stage::RecordStage;

/// Feed `rows` into `stages[0]` and carry whatever survives down the chain.
fn run_chain(rows: Vec<RawRecord>, stages: &mut [Box<dyn RecordStage>]) -> Vec<RawRecord> {
    stages.iter_mut().fold(rows, |batch, stage| {
        batch
            .into_iter()
            .flat_map(|row| stage.process(row))
            .collect()
    })
}

/// Drive every input row through the chain, then drain each stage's
/// pending output (the COUNT total) through the stages after it.
pub fn execute_rat<I>(input: I, stages: &mut [Box<dyn RecordStage>]) -> Vec<RawRecord>
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut output: Vec<RawRecord> = input
        .into_iter()
        .flat_map(|row| run_chain(vec![row], &mut *stages))
        .collect();

    for i in 0..stages.len() {
        let (head, tail) = stages.split_at_mut(i + 1);
        let pending = head[i].flush();
        if !pending.is_empty() {
            output.extend(run_chain(pending, tail));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_stage::{CountStage, ShapeStage, SkipStage, count_stages};
    use chrono::NaiveDate;

    fn person(birthdate: &str) -> RawRecord {
        RawRecord::from_fields(&["a", "b", "c", birthdate])
    }

    #[test]
    fn test_empty_chain_passthrough() {
        let input = vec![person("1"), person("2")];
        let output = execute_rat(input.clone(), &mut []);
        assert_eq!(output, input);
    }

    #[test]
    fn test_skip_then_count() {
        let mut stages: Vec<Box<dyn RecordStage>> =
            vec![Box::new(SkipStage::new(1)), Box::new(CountStage::new())];
        let output = execute_rat(vec![person("h"), person("x"), person("y")], &mut stages);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].field(0).unwrap(), "2");
    }

    #[test]
    fn test_count_flush_passes_downstream_stages() {
        // COUNT's one-field flush record is dropped by a downstream SHAPE 4.
        let mut stages: Vec<Box<dyn RecordStage>> =
            vec![Box::new(CountStage::new()), Box::new(ShapeStage::new(4))];
        let output = execute_rat(vec![person("x")], &mut stages);
        assert!(output.is_empty());
    }

    #[test]
    fn test_full_chain() {
        let reference = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut stages = count_stages(reference, 30);
        let input = vec![
            RawRecord::from_fields(&["name", "email", "city", "birthdate"]),
            person("1990/05/01"),
            person("2000/05/01"),
            RawRecord::from_fields(&["short", "row", "1950/01/01"]),
            person("bad"),
        ];
        let output = execute_rat(input, &mut stages);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].field(0).unwrap(), "1");
    }
}
