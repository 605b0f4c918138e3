//! Fixed conversion matrices.
//!
//! All 3x3 constants come from the CSS Color 4 reference conversions
//! (linear RGB <-> XYZ per space, Bradford chromatic adaptation between the
//! D65 and D50 white points, and the OKLab LMS matrices). They are
//! compile-time constants, never computed at runtime.

pub type Matrix = [[f64; 3]; 3];

/// Multiply a 3x3 matrix with a 3-vector.
#[inline]
pub fn multiply(matrix: &Matrix, vector: [f64; 3]) -> [f64; 3] {
    let [r1, r2, r3] = matrix;
    [
        r1[0].mul_add(vector[0], r1[1].mul_add(vector[1], r1[2] * vector[2])),
        r2[0].mul_add(vector[0], r2[1].mul_add(vector[1], r2[2] * vector[2])),
        r3[0].mul_add(vector[0], r3[1].mul_add(vector[1], r3[2] * vector[2])),
    ]
}

#[rustfmt::skip]
pub const LINEAR_SRGB_TO_XYZ_D65: Matrix = [
    [ 0.41239079926595934, 0.357584339383878,   0.1804807884018343  ],
    [ 0.21263900587151027, 0.715168678767756,   0.07219231536073371 ],
    [ 0.01933081871559182, 0.11919477979462598, 0.9505321522496607  ],
];

#[rustfmt::skip]
pub const XYZ_D65_TO_LINEAR_SRGB: Matrix = [
    [  3.2409699419045226,  -1.537383177570094,   -0.4986107602930034  ],
    [ -0.9692436362808796,   1.8759675015077202,   0.04155505740717559 ],
    [  0.05563007969699366, -0.20397695888897652,  1.0569715142428786  ],
];

#[rustfmt::skip]
pub const LINEAR_P3_TO_XYZ_D65: Matrix = [
    [ 0.4865709486482162, 0.26566769316909306, 0.1982172852343625 ],
    [ 0.2289745640697488, 0.6917385218365064,  0.079286914093745  ],
    [ 0.0,                0.04511338185890264, 1.043944368900976  ],
];

#[rustfmt::skip]
pub const XYZ_D65_TO_LINEAR_P3: Matrix = [
    [  2.493496911941425,   -0.9313836179191239,  -0.40271078445071684  ],
    [ -0.8294889695615747,   1.7626640603183463,   0.023624685841943577 ],
    [  0.03584583024378447, -0.07617238926804182,  0.9568845240076872   ],
];

#[rustfmt::skip]
pub const LINEAR_A98_TO_XYZ_D65: Matrix = [
    [ 0.5766690429101305,  0.1855582379065463,  0.1882286462349947  ],
    [ 0.29734497525053605, 0.6273635662554661,  0.07529145849399788 ],
    [ 0.02703136138641234, 0.07068885253582723, 0.9913375368376388  ],
];

#[rustfmt::skip]
pub const XYZ_D65_TO_LINEAR_A98: Matrix = [
    [  2.0415879038107465,  -0.5650069742788596,  -0.34473135077832956 ],
    [ -0.9692436362808795,   1.8759675015077202,   0.04155505740717557 ],
    [  0.013444280632031142,-0.11836239223101838,  1.0151749943912054  ],
];

#[rustfmt::skip]
pub const LINEAR_REC2020_TO_XYZ_D65: Matrix = [
    [ 0.6369580483012914, 0.14461690358620832,  0.1688809751641721  ],
    [ 0.2627002120112671, 0.6779980715188708,   0.05930171646986196 ],
    [ 0.0,                0.028072693049087428, 1.060985057710791   ],
];

#[rustfmt::skip]
pub const XYZ_D65_TO_LINEAR_REC2020: Matrix = [
    [  1.7166511879712674,   -0.35567078377639233, -0.25336628137365974 ],
    [ -0.6666843518324892,    1.6164812366349395,   0.01576854581391113 ],
    [  0.017639857445310783, -0.042770613257808524, 0.9421031212354738  ],
];

/// ProPhoto is D50-referenced; this pair goes straight to XYZ-D50.
#[rustfmt::skip]
pub const LINEAR_PROPHOTO_TO_XYZ_D50: Matrix = [
    [ 0.7977604896723027, 0.13518583717574031, 0.0313493495815248     ],
    [ 0.2880711282292934, 0.7118432178101014,  0.00008565396060525902 ],
    [ 0.0,                0.0,                 0.8251046025104601     ],
];

#[rustfmt::skip]
pub const XYZ_D50_TO_LINEAR_PROPHOTO: Matrix = [
    [  1.3457989731028281,  -0.25558010007997534, -0.05110628506753401 ],
    [ -0.5446224939028347,   1.5082327413132781,   0.02053603239147973 ],
    [  0.0,                  0.0,                  1.2119675456389454  ],
];

/// Bradford chromatic adaptation, D65 -> D50.
#[rustfmt::skip]
pub const XYZ_D65_TO_XYZ_D50: Matrix = [
    [  1.0479298208405488,   0.022946793341019088, -0.05019222954313557 ],
    [  0.029627815688159344, 0.990434484573249,    -0.01707382502938514 ],
    [ -0.009243058152591178, 0.015055144896577895,  0.7518742899580008  ],
];

/// Bradford chromatic adaptation, D50 -> D65.
#[rustfmt::skip]
pub const XYZ_D50_TO_XYZ_D65: Matrix = [
    [  0.9554734527042182,   -0.023098536874261423, 0.0632593086610217   ],
    [ -0.028369706963208136,  1.0099954580058226,   0.021041398966943008 ],
    [  0.012314001688319899, -0.020507696433477912, 1.3303659366080753   ],
];

#[rustfmt::skip]
pub const XYZ_D65_TO_LMS: Matrix = [
    [ 0.8190224432164319,   0.3619062562801221,  -0.12887378261216414 ],
    [ 0.0329836671980271,   0.9292868468965546,   0.03614466816999844 ],
    [ 0.048177199566046255, 0.26423952494422764,  0.6335478258136937  ],
];

#[rustfmt::skip]
pub const LMS_TO_XYZ_D65: Matrix = [
    [  1.2268798733741557,  -0.5578149965554813,   0.28139105017721583 ],
    [ -0.04057576262431372,  1.1122868293970594,  -0.07171106666151701 ],
    [ -0.07637294974672142, -0.4214933239627914,   1.5869240244272418  ],
];

#[rustfmt::skip]
pub const LMS_TO_OKLAB: Matrix = [
    [ 0.2104542553,  0.7936177850, -0.0040720468 ],
    [ 1.9779984951, -2.4285922050,  0.4505937099 ],
    [ 0.0259040371,  0.7827717662, -0.8086757660 ],
];

#[rustfmt::skip]
pub const OKLAB_TO_LMS: Matrix = [
    [ 0.99999999845051981432,  0.39633779217376785678,  0.21580375806075880339  ],
    [ 1.0000000088817607767,  -0.1055613423236563494,  -0.063854174771705903402 ],
    [ 1.0000000546724109177,  -0.089484182094965759684, -1.2914855378640917399  ],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: [f64; 3], b: [f64; 3], tol: f64) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < tol, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_srgb_matrices_are_inverses() {
        let v = [0.25, 0.5, 0.75];
        let round_trip = multiply(&XYZ_D65_TO_LINEAR_SRGB, multiply(&LINEAR_SRGB_TO_XYZ_D65, v));
        assert_close(round_trip, v, 1e-12);
    }

    #[test]
    fn test_bradford_matrices_are_inverses() {
        let v = [0.3, 0.4, 0.2];
        let round_trip = multiply(&XYZ_D50_TO_XYZ_D65, multiply(&XYZ_D65_TO_XYZ_D50, v));
        assert_close(round_trip, v, 1e-10);
    }

    #[test]
    fn test_white_point_maps_to_d50() {
        // D65 white in XYZ is close to (0.9505, 1.0, 1.0891); adapting to
        // D50 lands near (0.9642, 1.0, 0.8252).
        let white = multiply(&LINEAR_SRGB_TO_XYZ_D65, [1.0, 1.0, 1.0]);
        let d50 = multiply(&XYZ_D65_TO_XYZ_D50, white);
        assert_close(d50, [0.9642956764295677, 1.0, 0.8251046025104602], 1e-6);
    }
}
