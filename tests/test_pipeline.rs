mod common;

use common::*;
use image::DynamicImage;

#[test]
fn scenario_a_accepts_only_the_dark_chip() {
    let analysis = analyze(&scenario_a());

    assert_eq!(analysis.result.count, 1);
    let chip = &analysis.result.components[0];
    assert_eq!((chip.bbox.x, chip.bbox.y, chip.bbox.width, chip.bbox.height), (40, 40, 30, 30));
    assert_eq!(chip.center, (55, 55));
    assert!(chip.mean_intensity < 1.0);

    assert_eq!(verdict_at(&analysis, 105, 45), Some(Verdict::RejectedText));
    assert_eq!(verdict_at(&analysis, 42, 122), Some(Verdict::RejectedNoise));
    assert_eq!(analysis.classified.len(), 3);
}

#[test]
fn detect_matches_analyze() {
    let img = scenario_a();
    let pipeline = ComponentPipeline::new(DetectionConfig::default()).unwrap();
    let detected = pipeline.detect(&DynamicImage::ImageRgb8(img.clone())).unwrap();
    assert_eq!(detected, pipeline.analyze_rgb(&img).unwrap().result);
}

#[test]
fn pin_header_is_rejected_by_xray() {
    let img = BoardBuilder::new(200, 120, (10, 10, 180, 100))
        .header(40, 40, 5)
        .build();
    let analysis = analyze(&img);

    let header = analysis
        .classified
        .iter()
        .find(|c| c.candidate.bbox.contains(45, 45))
        .expect("header candidate");
    assert_eq!(header.verdict, Verdict::RejectedHeader);
    assert_eq!(header.pin_count, Some(5));
    assert_eq!(analysis.result.count, 0);
}

#[test]
fn header_gate_can_be_switched_off() {
    let img = BoardBuilder::new(200, 120, (10, 10, 180, 100))
        .header(40, 40, 5)
        .build();
    let config = DetectionConfig::new().with_rules(RuleToggles {
        header_xray_gate: false,
        ..RuleToggles::default()
    });
    let analysis = analyze_with(&img, config);
    assert_eq!(verdict_at(&analysis, 45, 45), Some(Verdict::Accepted));
}

#[test]
fn small_mid_tone_part_is_not_whitelisted() {
    let img = BoardBuilder::new(120, 120, (10, 10, 100, 100))
        .rect(40, 40, 18, 18, gray(150))
        .build();
    let analysis = analyze(&img);
    let part = analysis.classified.first().expect("one candidate");
    assert_eq!(part.verdict, Verdict::RejectedNoise);
    assert_eq!(part.rule, "Whitelist");
}

#[test]
fn large_mid_tone_part_is_accepted() {
    let img = BoardBuilder::new(120, 120, (10, 10, 100, 100))
        .rect(40, 40, 25, 25, gray(150))
        .build();
    assert_eq!(analyze(&img).result.count, 1);
}

#[test]
fn plated_hole_is_screw_hole() {
    let img = BoardBuilder::new(150, 150, (10, 10, 130, 130))
        .circle(75, 75, 15, gray(140))
        .build();
    let analysis = analyze(&img);
    assert_eq!(verdict_at(&analysis, 75, 75), Some(Verdict::RejectedScrewHole));
}

#[test]
fn small_bright_lead_is_pin() {
    let img = BoardBuilder::new(120, 120, (10, 10, 100, 100))
        .rect(40, 40, 12, 12, gray(175))
        .build();
    assert_eq!(verdict_at(&analyze(&img), 45, 45), Some(Verdict::RejectedPin));
}

#[test]
fn thin_trace_is_rejected_by_shape() {
    let img = BoardBuilder::new(200, 100, (10, 10, 180, 80))
        .rect(30, 40, 100, 8, CHIP)
        .build();
    let analysis = analyze(&img);
    let trace = analysis.classified.first().expect("one candidate");
    assert_eq!((trace.verdict, trace.rule), (Verdict::RejectedNoise, "Shape Gate"));
}

#[test]
fn dark_objects_off_the_board_are_ignored() {
    let img = BoardBuilder::new(200, 200, (50, 50, 100, 100))
        .rect(5, 5, 30, 30, BLACK)
        .rect(70, 70, 30, 30, BLACK)
        .build();
    let analysis = analyze(&img);
    assert_eq!(analysis.result.count, 1);
    assert_eq!(analysis.result.components[0].bbox.x, 70);
}

#[test]
fn components_are_reported_in_discovery_order() {
    let img = BoardBuilder::new(200, 200, (10, 10, 180, 180))
        .rect(120, 30, 30, 30, BLACK)
        .rect(30, 30, 30, 30, BLACK)
        .rect(60, 120, 30, 30, BLACK)
        .build();
    let result = analyze(&img).result;
    let origins: Vec<(u32, u32)> = result.components.iter().map(|c| (c.bbox.x, c.bbox.y)).collect();
    assert_eq!(origins, vec![(30, 30), (120, 30), (60, 120)]);
}

#[test]
fn desk_without_board_color_fails() {
    let img = image::RgbImage::from_pixel(64, 64, WHITE);
    let pipeline = ComponentPipeline::new(DetectionConfig::default()).unwrap();
    assert!(matches!(pipeline.analyze_rgb(&img), Err(BoardScanError::EmptyMask)));
}

#[test]
fn board_touching_the_left_edge_is_found() {
    let img = BoardBuilder::new(200, 200, (0, 20, 160, 160))
        .rect(40, 60, 30, 30, BLACK)
        .build();
    let analysis = analyze(&img);

    assert_eq!(analysis.roi_mask.get_pixel(5, 100)[0], 255);
    assert_eq!(analysis.result.count, 1);
    let chip = &analysis.result.components[0];
    assert_eq!((chip.bbox.x, chip.bbox.y, chip.bbox.width, chip.bbox.height), (40, 60, 30, 30));
}

#[test]
fn full_frame_board_keeps_scenario_a_verdicts() {
    let img = BoardBuilder::new(200, 200, (0, 0, 200, 200))
        .rect(40, 40, 30, 30, BLACK)
        .rect(100, 40, 10, 10, WHITE)
        .rect(40, 120, 5, 5, gray(128))
        .build();
    let analysis = analyze(&img);

    assert_eq!(analysis.result.count, 1);
    assert_eq!(analysis.result.components[0].center, (55, 55));
    assert_eq!(verdict_at(&analysis, 105, 45), Some(Verdict::RejectedText));
    assert_eq!(verdict_at(&analysis, 42, 122), Some(Verdict::RejectedNoise));
}
