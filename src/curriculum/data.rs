//! Built-in curriculum tables
//!
//! Chapter ids are the platform's own identifiers, listed in the order the
//! platform unlocks them.

use super::ChapterId;

/// Ordered chapters per level
pub const LEVELS: &[(&str, &[ChapterId])] = &[
    ("L1", &[78, 79, 80, 81, 82, 83, 84, 85, 86, 87, 88, 89]),
    ("L2", &[64, 65, 66, 67, 68, 69, 70, 71, 72, 73, 74, 75]),
    ("L3", &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]),
    ("L4", &[14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25]),
    ("L5", &[52, 53, 54, 55, 56, 57, 58, 59, 60, 61, 62, 63]),
];

/// Chapter display names
pub const CHAPTER_NAMES: &[(ChapterId, &str)] = &[
    // Level 1
    (78, "Counting"),
    (79, "Shapes"),
    (80, "Comparing"),
    (81, "Addition"),
    (82, "Subtraction"),
    (83, "Categories"),
    (84, "Addition & Subtraction"),
    (85, "Comparing"),
    (86, "Patterns"),
    (87, "Big Numbers"),
    (88, "Measurement"),
    (89, "Problem Solving"),
    // Level 2
    (64, "Place Value"),
    (65, "Comparing"),
    (66, "Addition"),
    (67, "Subtraction"),
    (68, "Expressions"),
    (69, "Problem Solving"),
    (70, "Measurement"),
    (71, "Strategies (+ & -)"),
    (72, "Odds & Evens"),
    (73, "Big Numbers"),
    (74, "Algorithms (+ & -)"),
    (75, "Problem Solving"),
    // Level 3
    (1, "Shapes"),
    (2, "Skip-Counting"),
    (3, "Perimeter & Area"),
    (4, "Multiplication"),
    (5, "Perfect Squares"),
    (6, "The Distributive Property"),
    (7, "Variables"),
    (8, "Division"),
    (9, "Measurement"),
    (10, "Fractions"),
    (11, "Estimation"),
    (12, "Area"),
    // Level 4
    (14, "Shapes"),
    (15, "Multiplication"),
    (16, "Exponents"),
    (17, "Counting"),
    (18, "Division"),
    (19, "Logic"),
    (20, "Factors"),
    (21, "Fractions (+ & -)"),
    (22, "Integers"),
    (23, "Fractions (× & ÷)"),
    (24, "Decimals"),
    (25, "Probability"),
    // Level 5
    (52, "3D Solids"),
    (53, "Integers"),
    (54, "Expressions & Equations"),
    (55, "Statistics"),
    (56, "Factors & Multiples"),
    (57, "Fractions"),
    (58, "Sequences"),
    (59, "Ratios & Rates"),
    (60, "Decimals"),
    (61, "Percents"),
    (62, "Square Roots"),
    (63, "Exponents"),
];
