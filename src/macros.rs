#![allow(unused_macros)]

// --------------------
// Static maps
// --------------------

macro_rules! map {
    ($($key:expr => $val:expr,)*) => {
        &[$(($key, $val)),*]
    };
}

// ----------------------
// Testing related Macros
// ----------------------

macro_rules! assert_close {
    ($x:expr, $y:expr, $epsilon:expr) => {
        {
            let (x, y, epsilon) = ($x, $y, $epsilon);
            assert!(
                (x - y).abs() <= epsilon,
                "Assertion failed: `abs(left - right) <= epsilon`, with `left` = {:?}, `right` = {:?}, `epsilon` = {:?}",
                x,
                y,
                epsilon
            );
        }
    };
}
