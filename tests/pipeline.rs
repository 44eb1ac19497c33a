//! Full-pipeline tests: nest -> validate -> generate through the two
//! external operations.

use cutplan::{
    generate_job, validate_job, CutConfig, CutType, EngineError, GeneratorVersion, JobRequest,
    NestingMethod, PieceRequest, SheetConfig, ToolConfig,
};

fn piece(width: f64, height: f64) -> PieceRequest {
    PieceRequest {
        width,
        height,
        cut_type: CutType::External,
        name: None,
        quantity: 1,
        ignored: false,
    }
}

fn basic_job() -> JobRequest {
    JobRequest {
        pieces: vec![piece(100.0, 200.0), piece(300.0, 150.0)],
        sheet: None,
        cut: None,
        tool: None,
        method: None,
    }
}

#[test]
fn valid_job_gets_a_preview_with_time_estimate() {
    let outcome = validate_job(&basic_job());
    assert!(outcome.valid, "unexpected errors: {:?}", outcome.errors);
    assert_eq!(outcome.preview.positioned.len(), 2);
    assert!(outcome.preview.unpositioned.is_empty());
    assert!(outcome.preview.metrics.used_area > 0.0);
    let estimate = outcome.preview.time_estimate.expect("missing estimate");
    assert!(estimate.total_time > 0.0);
}

#[test]
fn oversize_piece_reports_error_on_pecas() {
    // A piece wider than the sheet is returned unpositioned and turns
    // the whole configuration invalid.
    let mut job = basic_job();
    job.pieces.push(piece(5000.0, 100.0));
    let outcome = validate_job(&job);
    assert!(!outcome.valid);
    assert!(outcome.errors.iter().any(|e| e.field == "pecas"));
    assert_eq!(outcome.preview.unpositioned.len(), 1);
    assert_eq!(outcome.preview.positioned.len(), 2);
    assert!(outcome.preview.time_estimate.is_none());
}

#[test]
fn invalid_values_are_clamped_for_the_preview_but_still_reported() {
    let mut job = basic_job();
    job.cut = Some(CutConfig {
        feedrate: -100.0,
        ..Default::default()
    });
    let outcome = validate_job(&job);
    assert!(!outcome.valid);
    assert!(outcome.errors.iter().any(|e| e.field == "avanco"));
    // The preview still nested the pieces despite the bad feedrate.
    assert_eq!(outcome.preview.positioned.len(), 2);
}

#[test]
fn quantity_expands_into_individual_pieces() {
    let mut job = basic_job();
    job.pieces = vec![PieceRequest {
        quantity: 4,
        ..piece(100.0, 100.0)
    }];
    let outcome = validate_job(&job);
    assert_eq!(
        outcome.preview.positioned.len() + outcome.preview.unpositioned.len(),
        4
    );
}

#[test]
fn ignored_pieces_never_reach_the_program() {
    let mut job = basic_job();
    job.pieces[1].ignored = true;
    let outcome = generate_job(&job, GeneratorVersion::Optimized, true).unwrap();
    assert_eq!(outcome.metadata.metrics.used_area, 100.0 * 200.0);
}

#[test]
fn generate_returns_program_and_metadata() {
    let outcome = generate_job(&basic_job(), GeneratorVersion::Optimized, false).unwrap();
    assert!(outcome.program.starts_with("G21\n"));
    assert!(outcome.program.ends_with("M30\n"));
    assert_eq!(
        outcome.metadata.line_count,
        outcome.program.lines().count()
    );
    assert_eq!(outcome.metadata.byte_size, outcome.program.len());
    assert_eq!(outcome.metadata.configs_used.version, GeneratorVersion::Optimized);
}

#[test]
fn generation_is_blocked_by_validation_errors() {
    let mut job = basic_job();
    job.cut = Some(CutConfig {
        total_depth: 6.0,
        depth_per_pass: 9.0,
        ..Default::default()
    });
    let err = generate_job(&job, GeneratorVersion::Optimized, false).unwrap_err();
    match err {
        EngineError::GenerationBlocked { errors } => {
            assert!(errors.iter().any(|e| e.field == "profundidadePorPasse"));
        }
        other => panic!("expected GenerationBlocked, got {other:?}"),
    }
}

#[test]
fn all_methods_produce_generable_layouts() {
    for method in [
        NestingMethod::Greedy,
        NestingMethod::Shelf,
        NestingMethod::Guillotine,
    ] {
        let mut job = basic_job();
        job.method = Some(method);
        let outcome = generate_job(&job, GeneratorVersion::Optimized, false)
            .unwrap_or_else(|e| panic!("{method}: {e}"));
        assert!(outcome.metadata.time_estimate.total_distance > 0.0);
    }
}

#[test]
fn pipeline_is_deterministic_end_to_end() {
    let job = JobRequest {
        pieces: vec![piece(400.0, 300.0), piece(200.0, 200.0), piece(150.0, 600.0)],
        sheet: Some(SheetConfig::default()),
        cut: Some(CutConfig::default()),
        tool: Some(ToolConfig::default()),
        method: Some(NestingMethod::Guillotine),
    };
    let a = generate_job(&job, GeneratorVersion::Verbose, false).unwrap();
    let b = generate_job(&job, GeneratorVersion::Verbose, false).unwrap();
    assert_eq!(a.program, b.program);
}

#[test]
fn job_request_parses_from_json() {
    let raw = r#"{
        "pieces": [
            { "width": 100, "height": 200 },
            { "width": 300, "height": 150, "cut_type": "internal", "name": "fundo", "quantity": 2 }
        ],
        "cut": { "total_depth": 15, "depth_per_pass": 3.75 },
        "method": "shelf"
    }"#;
    let job: JobRequest = serde_json::from_str(raw).unwrap();
    assert_eq!(job.pieces.len(), 2);
    assert_eq!(job.pieces[1].quantity, 2);
    assert_eq!(job.method, Some(NestingMethod::Shelf));
    let cut = job.cut.unwrap();
    assert_eq!(cut.depth_per_pass, 3.75);
    // Omitted cut fields fall back to defaults.
    assert_eq!(cut.feedrate, CutConfig::default().feedrate);
}
