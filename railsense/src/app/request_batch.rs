use std::{io::Write, path::Path};

use rayon::prelude::*;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::AppError;
use crate::{
    decision::{DecisionError, DecisionErrorRecord},
    source, util,
};

/// a request file holds either one request object or an array of them.
#[derive(Clone, Debug)]
pub enum RequestBatch<T> {
    Many(Vec<T>),
    One(T),
}

/// a request as read from a request file: the typed request, or the reason
/// it could not be read.
pub type ParsedRequest<T> = Result<T, DecisionError>;

/// the outcome of one request: the decision, or the error that replaced it.
#[derive(Serialize, Clone, Debug)]
#[serde(untagged)]
pub enum DecisionResponse<T> {
    Success(T),
    Failure { error: DecisionErrorRecord },
}

impl<T> From<Result<T, DecisionError>> for DecisionResponse<T> {
    fn from(result: Result<T, DecisionError>) -> Self {
        match result {
            Ok(value) => DecisionResponse::Success(value),
            Err(e) => DecisionResponse::Failure {
                error: DecisionErrorRecord::from(&e),
            },
        }
    }
}

impl<T> DecisionResponse<T> {
    pub fn success(&self) -> Option<&T> {
        match self {
            DecisionResponse::Success(value) => Some(value),
            DecisionResponse::Failure { .. } => None,
        }
    }
}

impl<T> RequestBatch<T>
where
    T: DeserializeOwned,
{
    /// reads a request file. every array element is deserialized on its own,
    /// so a malformed element becomes an invalid request at its position
    /// while the others are still served.
    pub fn read(path: &Path) -> Result<RequestBatch<ParsedRequest<T>>, AppError> {
        let value: Value = source::read_json(path)?;
        Ok(RequestBatch::from_value(value))
    }

    pub fn from_value(value: Value) -> RequestBatch<ParsedRequest<T>> {
        match value {
            Value::Array(items) => RequestBatch::Many(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(idx, item)| {
                        serde_json::from_value::<T>(item).map_err(|e| {
                            DecisionError::InvalidRequest(format!("request {idx}: {e}"))
                        })
                    })
                    .collect(),
            ),
            other => RequestBatch::One(
                serde_json::from_value::<T>(other)
                    .map_err(|e| DecisionError::InvalidRequest(e.to_string())),
            ),
        }
    }
}

impl<T> RequestBatch<ParsedRequest<T>>
where
    T: Sync,
{
    /// runs every readable request on the rayon pool. a failing request
    /// becomes an error record and does not affect the others. results keep
    /// request order.
    pub fn run<R, F>(&self, op: F) -> RequestBatch<DecisionResponse<R>>
    where
        R: Send,
        F: Fn(&T) -> Result<R, DecisionError> + Sync,
    {
        let respond = |request: &ParsedRequest<T>| -> DecisionResponse<R> {
            match request {
                Ok(request) => op(request).into(),
                Err(e) => DecisionResponse::from(Err::<R, _>(e.clone())),
            }
        };
        match self {
            RequestBatch::One(request) => RequestBatch::One(respond(request)),
            RequestBatch::Many(requests) => {
                let responses: Vec<DecisionResponse<R>> =
                    requests.par_iter().map(respond).collect();
                let n_failed = responses.iter().filter(|r| r.success().is_none()).count();
                log::info!(
                    "processed {} requests, {} failed",
                    responses.len(),
                    n_failed
                );
                RequestBatch::Many(responses)
            }
        }
    }
}

impl<R> RequestBatch<DecisionResponse<R>>
where
    R: Serialize,
{
    pub fn successes(&self) -> Vec<&R> {
        match self {
            RequestBatch::One(response) => response.success().into_iter().collect(),
            RequestBatch::Many(responses) => {
                responses.iter().filter_map(|r| r.success()).collect()
            }
        }
    }

    /// writes the responses as pretty JSON to a file, or to stdout when no
    /// file is given. a single request produces a single object.
    pub fn write(&self, output_file: Option<&Path>) -> Result<(), AppError> {
        match output_file {
            Some(path) => {
                util::fs::write_json_pretty(self, path, true).map_err(|message| {
                    AppError::WriteError {
                        path: path.to_owned(),
                        message,
                    }
                })?;
                log::info!("responses written to {}", path.display());
                Ok(())
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                serde_json::to_writer_pretty(&mut stdout, self)
                    .and_then(|_| writeln!(stdout).map_err(serde_json::Error::io))
                    .map_err(|e| AppError::Internal(format!("failure writing responses: {e}")))
            }
        }
    }
}

impl<T> Serialize for RequestBatch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            RequestBatch::Many(items) => items.serialize(serializer),
            RequestBatch::One(item) => item.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::decision::TrainInfo;

    fn train_info_json(day_of_week: &str) -> Value {
        json!({
            "train_number": "12613", "track_section": "SBC", "day_of_week": day_of_week,
            "hour_of_day": 10, "weather_condition": "Clear", "trains_in_section_hour": 5
        })
    }

    #[test]
    fn test_single_and_many() {
        let one = RequestBatch::<TrainInfo>::from_value(train_info_json("Monday"));
        assert!(matches!(one, RequestBatch::One(Ok(_))));
        let many = RequestBatch::<TrainInfo>::from_value(json!([
            train_info_json("Monday"),
            train_info_json("Friday")
        ]));
        assert!(matches!(many, RequestBatch::Many(ref v) if v.len() == 2 && v.iter().all(|r| r.is_ok())));
    }

    #[test]
    fn test_malformed_element_does_not_reject_the_batch() {
        let batch = RequestBatch::<TrainInfo>::from_value(json!([
            train_info_json("Monday"),
            train_info_json("Funday")
        ]));
        let responses = batch.run(|info| Ok::<_, DecisionError>(info.hour_of_day));
        assert_eq!(responses.successes(), vec![&10]);

        let json = serde_json::to_value(&responses).unwrap();
        assert_eq!(json[0], 10);
        assert_eq!(json[1]["error"]["kind"], "invalid_request");
        let message = json[1]["error"]["message"].as_str().unwrap();
        assert!(message.contains("request 1"), "{message}");
        assert!(message.contains("Funday"), "{message}");
    }

    #[test]
    fn test_malformed_single_request_keeps_serde_message() {
        let mut value = train_info_json("Monday");
        value["hour_of_day"] = json!("ten");
        let batch = RequestBatch::<TrainInfo>::from_value(value);
        match batch {
            RequestBatch::One(Err(DecisionError::InvalidRequest(msg))) => {
                assert!(msg.contains("invalid type"), "{msg}")
            }
            other => panic!("expected an invalid request, found {other:?}"),
        }
    }

    #[test]
    fn test_failures_become_error_records() {
        let batch: RequestBatch<ParsedRequest<u32>> = RequestBatch::Many(vec![Ok(1), Ok(2), Ok(3)]);
        let responses = batch.run(|n| {
            if n % 2 == 0 {
                Err(DecisionError::InvalidRequest(format!("{n} is even")))
            } else {
                Ok(n * 10)
            }
        });
        assert_eq!(responses.successes(), vec![&10, &30]);
        let json = serde_json::to_value(&responses).unwrap();
        assert_eq!(json[0], 10);
        assert_eq!(json[1]["error"]["kind"], "invalid_request");
        assert_eq!(json[1]["error"]["message"], "invalid request: 2 is even");
        assert_eq!(json[2], 30);

        let single: RequestBatch<ParsedRequest<u32>> = RequestBatch::One(Ok(4));
        let json = serde_json::to_value(single.run(|n| Ok::<_, DecisionError>(n + 1))).unwrap();
        assert_eq!(json, 5);
    }
}
