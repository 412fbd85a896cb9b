use crate::output::{OutputKind, Outputs};
use std::fmt::Write;

// Wire parameter names expected by the logging endpoint
const PARAM_TIMESTAMP: &str = "mcu_timestamp";
const PARAM_IAQ: &str = "iaq";
const PARAM_IAQ_ACCURACY: &str = "iaq_accuracy";
const PARAM_TEMPERATURE: &str = "temperature";
const PARAM_PRESSURE: &str = "pressure";
const PARAM_HUMIDITY: &str = "humidity";
const PARAM_GAS_RESISTANCE: &str = "gas_resistance";
const PARAM_STABILIZATION_STATUS: &str = "stabilization_status";
const PARAM_RUN_IN_STATUS: &str = "run_in_status";

/// One reading batch serialized as the endpoint's query string
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Report {
    query: String,
}

impl Report {
    /// Builds the query string for a batch. An empty batch produces no
    /// report and therefore no request.
    pub fn from_outputs(outputs: &Outputs) -> Option<Self> {
        let first = outputs.first()?;

        let mut query = String::new();
        let _ = write!(query, "?{}={}", PARAM_TIMESTAMP, first.timestamp_ms());

        for output in outputs {
            match output.kind {
                OutputKind::Iaq => {
                    let _ = write!(query, "&{}={:.2}", PARAM_IAQ, output.signal);
                    let _ = write!(query, "&{}={}", PARAM_IAQ_ACCURACY, output.accuracy);
                }
                OutputKind::RawTemperature => {
                    let _ = write!(query, "&{}={:.2}", PARAM_TEMPERATURE, output.signal);
                }
                OutputKind::RawPressure => {
                    let _ = write!(query, "&{}={:.2}", PARAM_PRESSURE, output.signal);
                }
                OutputKind::RawHumidity => {
                    let _ = write!(query, "&{}={:.2}", PARAM_HUMIDITY, output.signal);
                }
                OutputKind::RawGasResistance => {
                    let _ = write!(query, "&{}={:.2}", PARAM_GAS_RESISTANCE, output.signal);
                }
                OutputKind::StabilizationStatus => {
                    let _ = write!(query, "&{}={:.2}", PARAM_STABILIZATION_STATUS, output.signal);
                }
                OutputKind::RunInStatus => {
                    let _ = write!(query, "&{}={:.2}", PARAM_RUN_IN_STATUS, output.signal);
                }
            }
        }

        Some(Self { query })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Appends the query string to the fixed endpoint
    pub fn url(&self, endpoint: &str) -> String {
        let mut url = String::with_capacity(endpoint.len() + self.query.len());
        url.push_str(endpoint);
        url.push_str(&self.query);
        url
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::output::Output;
    use rstest::rstest;

    fn batch(entries: &[(OutputKind, f32, u8)]) -> Outputs {
        let mut outputs = Outputs::new();
        for (kind, signal, accuracy) in entries {
            outputs
                .push(Output::new(*kind, *signal, *accuracy, 2_000_000_000))
                .unwrap();
        }
        outputs
    }

    #[test]
    fn empty_batch_yields_no_report() {
        assert_eq!(Report::from_outputs(&Outputs::new()), None);
    }

    #[rstest]
    #[case(OutputKind::RawTemperature, 23.456, "&temperature=23.46")]
    #[case(OutputKind::RawPressure, 1013.2, "&pressure=1013.20")]
    #[case(OutputKind::RawHumidity, 45.678, "&humidity=45.68")]
    #[case(OutputKind::RawGasResistance, 52301.8, "&gas_resistance=52301.80")]
    #[case(OutputKind::StabilizationStatus, 1.0, "&stabilization_status=1.00")]
    #[case(OutputKind::RunInStatus, 0.0, "&run_in_status=0.00")]
    fn single_output_parameters(
        #[case] kind: OutputKind,
        #[case] signal: f32,
        #[case] expected: &str,
    ) {
        let report = Report::from_outputs(&batch(&[(kind, signal, 0)])).unwrap();
        assert_eq!(report.query(), format!("?mcu_timestamp=2000{expected}"));
    }

    #[test]
    fn iaq_carries_its_accuracy() {
        let report = Report::from_outputs(&batch(&[(OutputKind::Iaq, 51.5, 3)])).unwrap();
        assert_eq!(report.query(), "?mcu_timestamp=2000&iaq=51.50&iaq_accuracy=3");
    }

    #[test]
    fn full_subscription_serializes_in_arrival_order() {
        let report = Report::from_outputs(&batch(&[
            (OutputKind::Iaq, 25.0, 1),
            (OutputKind::RawTemperature, 21.37, 0),
            (OutputKind::RawPressure, 1008.25, 0),
            (OutputKind::RawHumidity, 40.0, 0),
            (OutputKind::RawGasResistance, 104732.4, 0),
            (OutputKind::StabilizationStatus, 1.0, 0),
            (OutputKind::RunInStatus, 1.0, 0),
        ]))
        .unwrap();

        assert_eq!(
            report.query(),
            "?mcu_timestamp=2000\
             &iaq=25.00&iaq_accuracy=1\
             &temperature=21.37\
             &pressure=1008.25\
             &humidity=40.00\
             &gas_resistance=104732.40\
             &stabilization_status=1.00\
             &run_in_status=1.00"
        );
    }

    #[test]
    fn url_appends_query_to_endpoint() {
        let report = Report::from_outputs(&batch(&[(OutputKind::RawHumidity, 50.0, 0)])).unwrap();
        assert_eq!(
            report.url("https://logger.example/ingest"),
            "https://logger.example/ingest?mcu_timestamp=2000&humidity=50.00"
        );
    }

    #[test]
    fn timestamp_comes_from_the_first_output() {
        let mut outputs = Outputs::new();
        outputs
            .push(Output::new(OutputKind::Iaq, 30.0, 2, 7_654_000_000))
            .unwrap();
        outputs
            .push(Output::new(OutputKind::RawHumidity, 50.0, 0, 9_999_000_000))
            .unwrap();

        let report = Report::from_outputs(&outputs).unwrap();
        assert!(report.query().starts_with("?mcu_timestamp=7654&"));
    }
}
