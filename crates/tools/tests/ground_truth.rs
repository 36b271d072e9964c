//! Sample requests built from a known origin must find that origin again.

use texrot_common::BlockPos;
use texrot_model::Mode;
use texrot_schema::{ResponseStatus, parse_request, run_request};
use texrot_search::CancelToken;
use texrot_tools::SampleSpec;

#[test]
fn every_mode_recovers_its_origin() {
    for mode in Mode::ALL {
        let mut spec = SampleSpec::new(mode, BlockPos::new(-2_345, 71, 6_789));
        spec.margin = 16;
        spec.side_only_every = Some(4);
        let run = spec.to_request().to_run().unwrap();
        let outcome = run.execute();
        assert!(outcome.is_complete());
        assert!(outcome.matches.contains(&spec.origin), "{mode}");
    }
}

#[test]
fn sample_request_survives_json() {
    let mut spec = SampleSpec::new(Mode::Vanilla21_1, BlockPos::new(10, 64, 10));
    spec.margin = 8;
    let text = serde_json::to_vec_pretty(&spec.to_request()).unwrap();

    let loaded = parse_request(&text).unwrap();
    let response = run_request(&loaded, &CancelToken::new());
    assert_eq!(response.status, ResponseStatus::Complete);
    assert!(response.candidates.contains(&spec.origin));
    assert_eq!(response.mode, "Vanilla21_1Textures");
}
