//! Piece-square tables, midgame/endgame pairs.
//!
//! Tables are written with the eighth rank first, matching the a8 = 0
//! square layout; White indexes them directly, Black through a vertical
//! mirror (`sq ^ 56`).

pub const PAWN_VAL: (i32, i32) = (82, 94);
pub const KNIGHT_VAL: (i32, i32) = (337, 281);
pub const BISHOP_VAL: (i32, i32) = (365, 297);
pub const ROOK_VAL: (i32, i32) = (477, 512);
pub const QUEEN_VAL: (i32, i32) = (1025, 936);
pub const KING_VAL: (i32, i32) = (0, 0);

#[rustfmt::skip]
pub const PAWN_TABLE: ([i32; 64], [i32; 64]) = (
    [
         0,   0,   0,   0,   0,   0,   0,   0,
        60,  65,  50,  55,  45,  55,  30,  20,
        15,  20,  30,  35,  40,  45,  25,  10,
         0,   5,  10,  25,  25,  10,   5,  -5,
        -5,   0,   5,  18,  18,   0,   0, -10,
        -5,  -2,   0,   5,   8,  -5,   8,  -8,
        -10,  0, -10, -15, -12,  10,  12,  -8,
         0,   0,   0,   0,   0,   0,   0,   0,
    ],
    [
         0,   0,   0,   0,   0,   0,   0,   0,
       120, 115, 105,  90,  95,  90, 110, 125,
        60,  62,  55,  45,  40,  38,  55,  58,
        25,  20,  12,   5,   2,   8,  15,  20,
        10,   8,  -4,  -6,  -6,  -6,   2,   2,
         2,   4,  -5,   0,   0,  -4,   0,  -4,
         8,   6,   6,   8,  10,   2,   2,  -4,
         0,   0,   0,   0,   0,   0,   0,   0,
    ],
);

#[rustfmt::skip]
pub const KNIGHT_TABLE: ([i32; 64], [i32; 64]) = (
    [
       -80, -50, -30, -30, -30, -30, -50, -80,
       -40, -20,   0,   8,   8,   0, -20, -40,
       -30,   8,  18,  25,  25,  18,   8, -30,
       -30,  10,  22,  30,  30,  22,  10, -30,
       -30,   5,  20,  25,  25,  20,   5, -30,
       -30,   5,  12,  18,  18,  12,   5, -30,
       -40, -20,   0,   5,   5,   0, -20, -40,
       -80, -40, -30, -30, -30, -30, -40, -80,
    ],
    [
       -55, -35, -20, -20, -20, -20, -35, -55,
       -30, -15,  -5,   2,   2,  -5, -15, -30,
       -20,   0,  10,  15,  15,  10,   0, -20,
       -18,   5,  15,  22,  22,  15,   5, -18,
       -18,   2,  15,  20,  20,  15,   2, -18,
       -22,  -5,   5,  12,  12,   5,  -5, -22,
       -35, -18,  -5,   0,   0,  -5, -18, -35,
       -55, -35, -22, -18, -18, -22, -35, -55,
    ],
);

#[rustfmt::skip]
pub const BISHOP_TABLE: ([i32; 64], [i32; 64]) = (
    [
       -25, -10, -12, -10, -10, -12, -10, -25,
       -12,   0,   0,   0,   0,   0,   0, -12,
       -10,   0,   8,  10,  10,   8,   0, -10,
       -10,   8,   8,  12,  12,   8,   8, -10,
       -10,   5,  12,  12,  12,  12,   5, -10,
       -10,  10,  10,  10,  10,  10,  10, -10,
       -12,  15,   5,   5,   5,   5,  15, -12,
       -25, -10, -15, -10, -10, -15, -10, -25,
    ],
    [
       -15,  -8, -10,  -6,  -6, -10,  -8, -15,
        -6,  -2,   0,   0,   0,   0,  -2,  -6,
        -4,   0,   5,   8,   8,   5,   0,  -4,
        -4,   4,   8,  12,  12,   8,   4,  -4,
        -4,   4,   8,  12,  12,   8,   4,  -4,
        -6,   0,   5,   8,   8,   5,   0,  -6,
        -8,  -4,   0,   2,   2,   0,  -4,  -8,
       -15, -10,  -8,  -5,  -5,  -8, -10, -15,
    ],
);

#[rustfmt::skip]
pub const ROOK_TABLE: ([i32; 64], [i32; 64]) = (
    [
        20,  22,  18,  25,  25,  18,  22,  20,
        25,  28,  30,  32,  32,  30,  28,  25,
         0,   5,  10,  15,  15,  10,   5,   0,
        -5,   0,   5,  10,  10,   5,   0,  -5,
       -10,  -5,   0,   5,   5,   0,  -5, -10,
       -12,  -5,   0,   2,   2,   0,  -5, -12,
       -15,  -8,  -2,   2,   2,  -2,  -8, -15,
       -10,  -8,   5,  12,  12,   5, -20, -10,
    ],
    [
        10,  10,  12,  12,  12,  12,  10,  10,
        12,  14,  14,  14,  14,  14,  14,  12,
         6,   6,   8,   8,   8,   8,   6,   6,
         4,   4,   5,   5,   5,   5,   4,   4,
         0,   0,   2,   2,   2,   2,   0,   0,
        -4,  -2,   0,   0,   0,   0,  -2,  -4,
        -6,  -4,  -2,   0,   0,  -2,  -4,  -6,
        -6,  -4,   0,   2,   2,   0,  -4,  -6,
    ],
);

#[rustfmt::skip]
pub const QUEEN_TABLE: ([i32; 64], [i32; 64]) = (
    [
       -20, -10, -10,  -5,  -5, -10, -10, -20,
       -10,   0,   5,   0,   0,   0,   0, -10,
       -10,   5,   5,   5,   5,   5,   0, -10,
        -5,   0,   5,   8,   8,   5,   0,  -5,
        -5,   0,   5,   8,   8,   5,   0,  -5,
       -10,   5,   5,   5,   5,   5,   0, -10,
       -10,   0,   5,   0,   0,   0,   0, -10,
       -20, -10, -10,  -5,  -5, -10, -10, -20,
    ],
    [
       -18, -10,  -8,  -5,  -5,  -8, -10, -18,
       -10,  -4,   0,   4,   4,   0,  -4, -10,
        -8,   0,   8,  10,  10,   8,   0,  -8,
        -5,   4,  10,  16,  16,  10,   4,  -5,
        -5,   4,  10,  16,  16,  10,   4,  -5,
        -8,   0,   8,  10,  10,   8,   0,  -8,
       -10,  -4,   0,   4,   4,   0,  -4, -10,
       -18, -10,  -8,  -5,  -5,  -8, -10, -18,
    ],
);

#[rustfmt::skip]
pub const KING_TABLE: ([i32; 64], [i32; 64]) = (
    [
       -65, -55, -55, -60, -60, -55, -55, -65,
       -55, -50, -50, -55, -55, -50, -50, -55,
       -50, -45, -45, -50, -50, -45, -45, -50,
       -40, -38, -40, -45, -45, -40, -38, -40,
       -30, -30, -35, -40, -40, -35, -30, -30,
       -15, -18, -22, -30, -30, -22, -18, -15,
         5,   2, -10, -25, -25, -12,   2,   8,
        15,  25,   5, -15, -10,  -5,  28,  18,
    ],
    [
       -50, -30, -22, -18, -18, -22, -30, -50,
       -25, -10,   0,   8,   8,   0, -10, -25,
       -18,   5,  15,  20,  20,  15,   5, -18,
       -15,  10,  22,  28,  28,  22,  10, -15,
       -15,  10,  22,  28,  28,  22,  10, -15,
       -18,   2,  15,  20,  20,  15,   2, -18,
       -28, -10,   2,  10,  10,   2, -10, -28,
       -50, -35, -25, -20, -20, -25, -35, -50,
    ],
);
