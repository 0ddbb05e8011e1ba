//! Corpus tests: expressions that must parse and typeset, and expressions
//! that must be rejected with the right kind of error.

mod common;

use common::TestFonts;
use mathtex::error::{Error, ParseError};
use mathtex::Formula;

fn typeset(tex: &str) -> Result<Formula, Error> {
    Formula::new(tex, &TestFonts, 12.0, 100.0)
}

#[test]
fn corpus_passes() {
    // The classic regression corpus.
    let cases = [
        r"$a+b+\dots+\dot{s}+\ldots$",
        r"$x \doteq y$",
        r"\$100.00 $\alpha \_$",
        r"$\frac{\$100.00}{y}$",
        r"$x   y$",
        r"$x+y\ x=y\ x<y\ x:y\ x,y\ x@y$",
        r"$100\%y\ x*y\ x/y x\$y$",
        r"$x\leftarrow y\ x\forall y\ x-y$",
        r"$x \sf x \bf x {\cal X} \rm x$",
        r"$x\ x\,x\;x\quad x\qquad x\!x\hspace{ 0.5 }y$",
        r"$\{ \rm braces \}$",
        r"$\left[\left\lfloor\frac{5}{\frac{\left(3\right)}{4}} y\right)\right]$",
        r"$\left(x\right)$",
        r"$\sin(x)$",
        r"$x_2$",
        r"$x^2$",
        r"$x^2_y$",
        r"$x_y^2$",
        r"$\prod_{i=\alpha_{i+1}}^\infty$",
        r"$x = \frac{x+\frac{5}{2}}{\frac{y+3}{8}}$",
        r"$dz/dt = \gamma x^2 + {\rm sin}(2\pi y+\phi)$",
        r"Foo: $\alpha_{i+1}^j = {\rm sin}(2\pi f_j t_i) e^{-5 t_i/\tau}$",
        r"$\mathcal{R}\prod_{i=\alpha_{i+1}}^\infty a_i \sin(2 \pi f x_i)$",
        r"Variable $i$ is good",
        r"$\Delta_i^j$",
        r"$\Delta^j_{i+1}$",
        r"$\ddot{o}\acute{e}\grave{e}\hat{O}\breve{\imath}\tilde{n}\vec{q}$",
        r"$\arccos((x^i))$",
        r"$\gamma = \frac{x=\frac{6}{8}}{y} \delta$",
        r"$\limsup_{x\to\infty}$",
        r"$\oint^\infty_0$",
        r"$f^'$",
        r"$\frac{x_2888}{y}$",
        r"$\sqrt[3]{\frac{X_2}{Y}}=5$",
        r"$\sqrt[5]{\prod^\frac{x}{2\pi^2}_\infty}$",
        r"$\sqrt[3]{x}=5$",
        r"$\frac{X}{\frac{X}{Y}}$",
        r"$\mathcal{H} = \int d \tau \left(\epsilon E^2 + \mu H^2\right)$",
        r"$\widehat{abc}\widetilde{def}$",
        r"$\Gamma \Delta \Theta \Lambda \Xi \Pi \Sigma \Upsilon \Phi \Psi \Omega$",
        r"$\alpha \beta \gamma \delta \epsilon \zeta \eta \theta \iota \lambda \mu \nu \xi \pi \kappa \rho \sigma \tau \upsilon \phi \chi \psi$",
        // Commands the corpus above does not reach.
        r"$\operatorname{arsinh}(x)$",
        r"$\stackrel{a}{=}$",
        r"$\binom{n}{k}$",
        r"$\genfrac{[}{]}{0.5}{0}{a}{b}$",
        r"$\genfrac{}{\}}{1}{0}{a}{b}$",
        r"$\AA$",
        r"$\mathbb{R} \mathfrak{g} \mathsf{T} \mathtt{w}$",
        r"$\sum_{i=1}^n i$",
        r"$\left(\frac{a}{b}\right)$",
        r"$\left.\frac{a}{b}\right|$",
        r"$a \overrightarrow{v} b$",
        r"$_2^3$",
        r"$$",
        "plain text only",
        "",
    ];
    let mut errors: Vec<String> = Vec::new();
    for case in cases {
        if let Err(err) = typeset(case) {
            errors.push(format!("{:?} - should have passed.\n\tError: {}\n", case, err));
        }
    }
    if !errors.is_empty() {
        for err in errors {
            println!("\n{}", err);
        }
        panic!();
    }
}

#[test]
fn corpus_fails() {
    let cases = [
        r"$x_2_2$",
        r"$x^2^2$",
        r"$x^x_x^x$",
        r"$x_$",
        r"$1^$",
        r"$\sqrt$",
        r"$\sqrt[2$",
        r"$\frac12$",
        r"$\frac{1}$",
        r"$\frac \left(1 + 2\right) 3$",
        r"$\left(x\right$",
        r"$\left(x$",
        r"$\left1 x \right)$",
        r"${x$",
        r"$x",
        r"$\hspace{abc}$",
        r"$\operatorname{}$",
    ];
    let mut errors: Vec<String> = Vec::new();
    for case in cases {
        if typeset(case).is_ok() {
            errors.push(format!("{:?} - should have errored.\n", case));
        }
    }
    if !errors.is_empty() {
        for err in errors {
            println!("\n{}", err);
        }
        panic!();
    }
}

#[test]
fn unknown_commands_are_reported_as_such() {
    match typeset(r"$\foobar$") {
        Err(Error::Parse(ParseError::UnknownSymbol { symbol, position })) => {
            assert_eq!(symbol, r"\foobar");
            assert_eq!(position, 1);
        }
        other => panic!("expected UnknownSymbol, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn double_scripts_are_rejected_with_positions() {
    match typeset(r"$x_1_2$") {
        Err(Error::Parse(ParseError::DoubleSubscript { position })) => {
            assert_eq!(position, 4);
        }
        other => panic!("expected DoubleSubscript, got {:?}", other.map(|_| ())),
    }
    assert!(matches!(
        typeset(r"$x^1^2$"),
        Err(Error::Parse(ParseError::DoubleSuperscript { .. }))
    ));
    assert!(matches!(
        typeset(r"$x^a_b^c$"),
        Err(Error::Parse(ParseError::TooManyScripts { .. }))
    ));
}

#[test]
fn unterminated_math_reports_the_missing_dollar() {
    match typeset(r"$x") {
        Err(Error::Parse(ParseError::Expected { expected, .. })) => {
            assert!(expected.contains('$'), "unexpected message: {}", expected);
        }
        other => panic!("expected a parse error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn equivalent_spellings_produce_equal_draw_lists() {
    let pairs = [
        (r"$x_\alpha^\beta$", r"$x^\beta_\alpha$"),
        (r"$x   y$", r"$x y$"),
        (r"$\frac{1}{2}$", r"$\frac {1} {2}$"),
    ];
    for (left, right) in pairs {
        let left_formula = typeset(left).unwrap();
        let right_formula = typeset(right).unwrap();
        assert_eq!(
            left_formula.draw_list(),
            right_formula.draw_list(),
            "{} and {} should lay out identically",
            left,
            right
        );
    }
}
