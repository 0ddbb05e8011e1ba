//! Layout scenarios and invariants over the flat draw list, plus the
//! golden-hash regression harness.

mod common;

use std::collections::BTreeMap;
use std::path::Path;

use common::{formula, ref_em, ref_thickness, TestFonts};
use mathtex::error::{BackendError, Error};
use mathtex::layout::packer::PackMode;
use mathtex::layout::ship::{ship, ShippedGlyph};
use mathtex::layout::{Kern, Node, Rule};
use mathtex::render::{Backend, OutputFormat, Scene};
use mathtex::{Formula, FormulaCache};

use sha2::{Digest, Sha256};

/// The concrete scenarios from the regression corpus, rendered at the
/// reference 12 pt / 100 dpi.
const SCENARIOS: &[(&str, &str)] = &[
    ("single_glyph", r"$x$"),
    ("subscript", r"$x_2$"),
    ("superscript", r"$x^2$"),
    ("fraction", r"$\frac{1}{2}$"),
    ("sqrt", r"$\sqrt{x}$"),
    ("delimited_fraction", r"$\left(\frac{a}{b}\right)$"),
    ("sum_limits", r"$\sum_{i=1}^n i$"),
    ("escaped_dollar", r"\$100$ \alpha $"),
];

fn glyphs_with(f: &Formula, codepoint: u16) -> Vec<ShippedGlyph> {
    let (_, glyphs, _) = f.draw_list();
    glyphs
        .iter()
        .filter(|g| g.info.glyph.0 == codepoint)
        .cloned()
        .collect()
}

fn only_glyph(f: &Formula, codepoint: u16) -> ShippedGlyph {
    let found = glyphs_with(f, codepoint);
    assert_eq!(found.len(), 1, "expected exactly one glyph U+{:04X}", codepoint);
    found.into_iter().next().unwrap()
}

fn close(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

// ----------------------------------------------------------------------
// Scenarios
// ----------------------------------------------------------------------

#[test]
fn single_glyph_sits_on_the_baseline() {
    let f = formula(r"$x$");
    let (rects, glyphs, _) = f.draw_list();
    assert!(rects.is_empty());
    assert_eq!(glyphs.len(), 1);
    assert!(close(glyphs[0].x, 0.0, 1e-9));
    assert!(close(glyphs[0].y, f.height(), 1e-9));
}

#[test]
fn subscript_is_smaller_and_lower() {
    let f = formula(r"$x_2$");
    let (_, glyphs, _) = f.draw_list();
    assert_eq!(glyphs.len(), 2);
    let x = only_glyph(&f, 0x78);
    let two = only_glyph(&f, 0x32);
    assert!(two.info.fontsize < x.info.fontsize);
    assert!(two.y > x.y);
}

#[test]
fn superscript_is_smaller_and_higher() {
    let f = formula(r"$x^2$");
    let (_, glyphs, _) = f.draw_list();
    assert_eq!(glyphs.len(), 2);
    let x = only_glyph(&f, 0x78);
    let two = only_glyph(&f, 0x32);
    assert!(two.info.fontsize < x.info.fontsize);
    assert!(two.y < x.y);
}

#[test]
fn fraction_has_one_bar_wide_enough() {
    let f = formula(r"$\frac{1}{2}$");
    let (rects, glyphs, _) = f.draw_list();
    assert_eq!(rects.len(), 1, "the fraction bar is the only rectangle");
    assert!(glyphs.len() >= 2);
    let bar = rects[0];
    for glyph in glyphs {
        assert!(bar.width() >= glyph.info.metrics.width - 1e-9);
    }
}

#[test]
fn fraction_bar_sits_on_the_math_axis() {
    let f = formula(r"$\frac{1}{2}$");
    let (rects, _, _) = f.draw_list();
    let bar = rects[0];
    let mid = (bar.y1 + bar.y2) / 2.0;
    let axis = 0.31 * ref_em();
    let baseline = f.height();
    assert!(
        close(mid, baseline - axis, 1.0),
        "bar midline {} not within 1pt of the axis {}",
        mid,
        baseline - axis
    );
}

#[test]
fn radical_covers_its_body() {
    let f = formula(r"$\sqrt{x}$");
    let (rects, glyphs, _) = f.draw_list();
    assert_eq!(rects.len(), 1, "the vinculum is the only rectangle");
    assert_eq!(glyphs.len(), 2);
    let radical = only_glyph(&f, 0x221A);
    let x = only_glyph(&f, 0x78);
    let x_total = x.info.metrics.height;
    assert!(radical.info.metrics.height >= x_total);
    // The vinculum starts no lower than the radical's tick.
    assert!(rects[0].y1 < x.y);
}

#[test]
fn auto_delimiters_cover_the_fraction() {
    let f = formula(r"$\left(\frac{a}{b}\right)$");
    let (_, glyphs, _) = f.draw_list();
    assert_eq!(glyphs.len(), 4);
    let open = only_glyph(&f, 0x28);
    let close_paren = only_glyph(&f, 0x29);
    let a = only_glyph(&f, 0x61);
    let b = only_glyph(&f, 0x62);
    let content_total = a.info.metrics.height + b.info.metrics.height;
    assert!(open.info.metrics.height >= content_total);
    assert!(close_paren.info.metrics.height >= content_total);
    // One delimiter on each side of the content.
    assert!(open.x < a.x);
    assert!(close_paren.x > b.x);
}

#[test]
fn sum_stacks_its_limits() {
    let f = formula(r"$\sum_{i=1}^n i$");
    let sum = only_glyph(&f, 0x2211);
    let n = only_glyph(&f, 0x6E);
    let equals = only_glyph(&f, 0x3D);

    // Above and below, not to the side.
    assert!(n.y < sum.y);
    assert!(equals.y > sum.y);

    let sum_center = sum.x + sum.info.metrics.width / 2.0;
    let n_center = n.x + n.info.metrics.width / 2.0;
    assert!(
        close(sum_center, n_center, 1.5),
        "upper limit centered at {} but the sum at {}",
        n_center,
        sum_center
    );

    // The trailing i sits on the main baseline; the lower-limit i does not.
    let is = glyphs_with(&f, 0x69);
    assert_eq!(is.len(), 2);
    let trailing = is.iter().max_by(|a, b| a.x.partial_cmp(&b.x).unwrap()).unwrap();
    assert!(close(trailing.y, f.height(), 1e-9));
}

#[test]
fn escaped_dollars_set_text_outside_math() {
    let f = formula(r"\$100$ \alpha $");
    let (rects, glyphs, _) = f.draw_list();
    assert!(rects.is_empty());
    assert_eq!(glyphs.len(), 5);
    only_glyph(&f, 0x24);
    let alpha = only_glyph(&f, 0x3B1);
    // The alpha comes after the literal text.
    assert!(glyphs.iter().all(|g| g.x <= alpha.x + 1e-9));
}

// ----------------------------------------------------------------------
// Invariants
// ----------------------------------------------------------------------

#[test]
fn width_matches_the_bounding_box() {
    for (_, tex) in SCENARIOS {
        let f = formula(tex);
        let (_, _, bbox) = f.draw_list();
        assert!(close(f.width(), bbox.width(), 1e-9), "{}", tex);
    }
}

#[test]
fn shipping_twice_is_identical() {
    for (_, tex) in SCENARIOS {
        let f = formula(tex);
        let first = ship(0.0, 0.0, f.boxmodel());
        let second = ship(0.0, 0.0, f.boxmodel());
        assert_eq!(first.0, second.0, "{}", tex);
        assert_eq!(first.1, second.1, "{}", tex);
        assert_eq!(first.2, second.2, "{}", tex);
    }
}

#[test]
fn shrink_then_grow_restores_dimensions() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);

    for _ in 0..100 {
        let width: f64 = rng.gen_range(0.1..100.0);
        let height: f64 = rng.gen_range(0.1..100.0);
        let depth: f64 = rng.gen_range(0.0..50.0);
        let mut node = Node::Rule(Rule::new(width, height, depth));
        node.shrink(&TestFonts);
        node.grow(&TestFonts);
        assert!(close(node.width(), width, 1e-9 * width));
        assert!(close(node.height(), height, 1e-9 * height));
        assert!(close(node.depth(), depth, 1e-9 * depth.max(1.0)));

        let kern_width: f64 = rng.gen_range(-10.0..10.0);
        let mut kern = Node::Kern(Kern::new(kern_width));
        kern.shrink(&TestFonts);
        kern.grow(&TestFonts);
        assert!(close(kern.width(), kern_width, 1e-9 * kern_width.abs().max(1.0)));
    }

    // A whole parsed tree round-trips too.
    let f = formula(r"$\frac{1}{2} + \sqrt{x}$");
    let mut tree = f.boxmodel().clone();
    let width = tree.width;
    let mut node = Node::Hlist(tree.clone());
    node.shrink(&TestFonts);
    node.grow(&TestFonts);
    tree = match node {
        Node::Hlist(h) => h,
        _ => unreachable!(),
    };
    assert!(close(tree.width, width, 1e-9 * width));
}

#[test]
fn natural_width_is_final_width_without_glue_setting() {
    let f = formula(r"$xy$");
    let mut root = f.boxmodel().clone();
    assert_eq!(root.glue_sign, 0);
    let width = root.width;
    root.hpack(0.0, PackMode::Additional);
    assert!(close(root.width, width, 1e-12));
}

#[test]
fn every_emitted_glyph_has_metrics() {
    for (_, tex) in SCENARIOS {
        let f = formula(tex);
        let (_, glyphs, _) = f.draw_list();
        for glyph in glyphs {
            assert!(!glyph.info.face.is_empty());
            assert!(glyph.info.fontsize > 0.0);
            assert!(glyph.info.metrics.height.is_finite());
            assert!(glyph.info.metrics.advance.is_finite());
        }
    }
}

#[test]
fn kern_pairs_pull_glyphs_together() {
    let with_kern = formula(r"$AV$");
    let without = formula(r"$AW$");
    let v = only_glyph(&with_kern, 0x56);
    let w = only_glyph(&without, 0x57);
    // The (A, V) pair kern is -0.06 em.
    assert!(close(w.x - v.x, 0.06 * ref_em(), 0.51));
}

#[test]
fn spacing_commands_scale_with_the_em() {
    let quad = formula(r"$x\quad y$");
    let thin = formula(r"$x\,y$");
    let quad_gap = only_glyph(&quad, 0x79).x - only_glyph(&quad, 0x78).x;
    let thin_gap = only_glyph(&thin, 0x79).x - only_glyph(&thin, 0x78).x;
    // The gap difference is (1.6 - 0.4) of the em measure, the advance of
    // 'm' (0.82 em in the test font).
    assert!(
        close(quad_gap - thin_gap, 1.2 * 0.82 * ref_em(), 1e-6),
        "a quad should be 1.2 em-measures wider than a thin space"
    );
}

#[test]
fn fraction_spacers_scale_with_thickness() {
    // The gap between numerator bottom and bar top is 2x the rule
    // thickness, by construction.
    let f = formula(r"$\frac{1}{2}$");
    let (rects, _, _) = f.draw_list();
    let one = only_glyph(&f, 0x31);
    let gap = rects[0].y1 - one.y;
    assert!(gap >= 2.0 * ref_thickness() - 1e-9);
}

// ----------------------------------------------------------------------
// Facade
// ----------------------------------------------------------------------

#[test]
fn scene_receives_canvas_and_draw_list() {
    let f = formula(r"$\frac{1}{2}$");
    let mut scene = Scene::new();
    f.render_to(&mut scene);
    assert!(close(scene.width, f.width(), 1e-12));
    assert!(close(scene.height, f.height(), 1e-12));
    assert!(close(scene.depth, f.depth(), 1e-12));
    assert_eq!(scene.dpi, 100.0);
    let (rects, glyphs, _) = f.draw_list();
    assert_eq!(scene.glyphs.len(), glyphs.len());
    assert_eq!(scene.rects.len(), rects.len());
}

#[test]
fn saving_through_a_formatless_backend_fails() {
    let f = formula(r"$x$");
    let mut scene = Scene::new();
    let err = f
        .save(&mut scene, Path::new("/tmp/out.png"), OutputFormat::Png)
        .unwrap_err();
    assert_eq!(
        err,
        Error::Backend(BackendError::Unavailable(OutputFormat::Png))
    );
    assert!(Backend::formats(&scene).is_empty());
}

#[test]
fn formula_cache_reuses_parses_and_evicts_in_order() {
    let mut cache = FormulaCache::with_capacity(2);
    let first = Formula::with_cache(r"$x^2$", &TestFonts, 12.0, 100.0, &mut cache).unwrap();
    let again = Formula::with_cache(r"$x^2$", &TestFonts, 12.0, 100.0, &mut cache).unwrap();
    assert_eq!(first.draw_list(), again.draw_list());
    assert_eq!(cache.len(), 1);

    Formula::with_cache(r"$y$", &TestFonts, 12.0, 100.0, &mut cache).unwrap();
    Formula::with_cache(r"$z$", &TestFonts, 12.0, 100.0, &mut cache).unwrap();
    assert_eq!(cache.len(), 2);

    // Different parameters key different entries.
    let bigger = Formula::with_cache(r"$x^2$", &TestFonts, 24.0, 100.0, &mut cache).unwrap();
    assert!(bigger.width() > first.width());
}

#[test]
fn render_uses_the_reference_defaults() {
    let mut scene = Scene::new();
    mathtex::render(r"$x$", &TestFonts, &mut scene).unwrap();
    let f = formula(r"$x$");
    assert!(close(scene.width, f.width(), 1e-12));
    assert!(close(scene.height, f.height(), 1e-12));
}

// ----------------------------------------------------------------------
// Golden hashes
// ----------------------------------------------------------------------

const GOLDEN_FILE: &str = "tests/data/draw_list_hashes.json";

fn draw_list_hash(f: &Formula) -> String {
    let (rects, glyphs, bbox) = f.draw_list();
    let payload = serde_json::json!({
        "rects": rects,
        "glyphs": glyphs,
        "bbox": bbox,
        "width": f.width(),
        "height": f.height(),
        "depth": f.depth(),
    });
    let digest = Sha256::digest(payload.to_string().as_bytes());
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}

fn scenario_hashes() -> BTreeMap<String, String> {
    SCENARIOS
        .iter()
        .map(|&(name, tex)| (name.to_string(), draw_list_hash(&formula(tex))))
        .collect()
}

/// Compares against the checked-in reference hashes when they exist. Run
/// `update_golden_hashes` (ignored by default) to record a new baseline.
#[test]
fn golden_hashes() {
    let path = Path::new(GOLDEN_FILE);
    if !path.exists() {
        eprintln!("no golden hash file at {}; skipping comparison", GOLDEN_FILE);
        return;
    }
    let recorded: BTreeMap<String, String> =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    let current = scenario_hashes();
    let mut failures = Vec::new();
    for (name, hash) in &current {
        if let Some(expected) = recorded.get(name) {
            if expected != hash {
                failures.push(name.clone());
            }
        }
    }
    assert!(failures.is_empty(), "draw lists changed for: {:?}", failures);
}

#[test]
#[ignore]
fn update_golden_hashes() {
    let path = Path::new(GOLDEN_FILE);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let hashes = scenario_hashes();
    std::fs::write(path, serde_json::to_string_pretty(&hashes).unwrap()).unwrap();
}
