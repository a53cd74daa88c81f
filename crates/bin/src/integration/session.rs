//! Interactive prediction session.

use super::form::PriceForm;
use crema::{ArtifactStore, PipelineHandle, predict_price};
use std::io::{BufRead, Write};

/// Outcome counts for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SessionSummary {
    pub(crate) predicted: usize,
    pub(crate) failed: usize,
}

/// Run the form until the user quits, predicting after every completed form.
///
/// The model is loaded before the first prompt; a missing or unreadable
/// artifact ends the session without asking anything.
pub(crate) fn run_session<S, R, W>(
    handle: &PipelineHandle<S>,
    form: &mut PriceForm<R, W>,
) -> crema::Result<SessionSummary>
where
    S: ArtifactStore,
    R: BufRead,
    W: Write,
{
    let pipeline = handle.get()?;
    let mut summary = SessionSummary::default();

    while let Some(attrs) = form.read_attributes()? {
        let record = attrs.to_record();
        match attrs
            .validate()
            .map_err(crema::PipelineError::from)
            .and_then(|()| predict_price(Some(pipeline.as_ref()), &record))
        {
            Ok(price) => {
                summary.predicted += 1;
                writeln!(form.output(), "Predicted price: ₹{:.2}\n", price)?;
            }
            Err(e) => {
                summary.failed += 1;
                writeln!(form.output(), "Error: {}\n", e)?;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crema::data::Schema;
    use crema::data::schema::PRICE;
    use crema::model::ForestConfig;
    use crema::{FileArtifactStore, Pipeline};
    use crema_data::CoffeeAttributes;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn form(input: &str) -> PriceForm<Cursor<Vec<u8>>, Vec<u8>> {
        PriceForm::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(form: &mut PriceForm<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(form.output().clone()).unwrap()
    }

    #[test]
    fn test_missing_model_stops_before_prompting() {
        let dir = TempDir::new().unwrap();
        let handle = PipelineHandle::from_file(dir.path().join("absent.bin"));
        let mut form = form("\n\n\n\n\n\n\nq\n");

        let err = run_session(&handle, &mut form).unwrap_err();

        assert!(matches!(err, crema::PipelineError::ArtifactNotFound(_)));
        assert!(output(&mut form).is_empty());
    }

    #[test]
    fn test_corrupt_model_stops_before_prompting() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.bin");
        std::fs::write(&path, b"not a model").unwrap();
        let handle = PipelineHandle::from_file(&path);
        let mut form = form("\n\n\n\n\n\n\n");

        let err = run_session(&handle, &mut form).unwrap_err();

        assert!(matches!(err, crema::PipelineError::ArtifactCorrupt { .. }));
        assert!(output(&mut form).is_empty());
    }

    #[test]
    fn test_predicts_each_completed_form() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.bin");

        let records: Vec<_> = (0..20)
            .map(|i| {
                let attrs = CoffeeAttributes {
                    bean_cost: 60.0 + 10.0 * i as f64,
                    ..Default::default()
                };
                attrs
                    .to_record()
                    .with_numeric(PRICE, 200.0 + attrs.bean_cost)
            })
            .collect();
        let config = ForestConfig {
            num_trees: 5,
            ..Default::default()
        };
        let pipeline = Pipeline::new(Schema::coffee(), config)
            .fit(&records)
            .unwrap();
        FileArtifactStore::new().save(&pipeline, &path).unwrap();

        let handle = PipelineHandle::from_file(&path);
        let mut form = form("\n\n\n\n\n\n\nKenya\n\n\n\n\n250\n\n");

        let summary = run_session(&handle, &mut form).unwrap();

        assert_eq!(summary.predicted, 2);
        assert_eq!(output(&mut form).matches("Predicted price: ₹").count(), 2);
    }
}
