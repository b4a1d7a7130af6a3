//! Face naming tables for the five solids and the catalogue of named puzzles

use phf::phf_map;

/// Named puzzles and their descriptions
pub static PUZZLES: phf::Map<&'static str, &'static str> = phf_map! {
    "2x2x2" => "c f 0",
    "3x3x3" => "c f 0.333333333333333",
    "4x4x4" => "c f 0.5 f 0",
    "5x5x5" => "c f 0.6 f 0.2",
    "6x6x6" => "c f 0.666666666666667 f 0.333333333333333 f 0",
    "7x7x7" => "c f 0.714285714285714 f 0.428571428571429 f 0.142857142857143",
    "8x8x8" => "c f 0.75 f 0.5 f 0.25 f 0",
    "9x9x9" => "c f 0.777777777777778 f 0.555555555555556 f 0.333333333333333 f 0.111111111111111",
    "10x10x10" => "c f 0.8 f 0.6 f 0.4 f 0.2 f 0",
    "skewb" => "c v 0",
    "master skewb" => "c v 0.275",
    "professor skewb" => "c v 0 v 0.38",
    "compy cube" => "c v 0.915641442663986",
    "helicopter" => "c e 0.707106781186547",
    "curvy copter" => "c e 0.83",
    "dino" => "c v 0.577350269189626",
    "little chop" => "c e 0",
    "pyramorphix" => "t e 0",
    "mastermorphix" => "t e 0.346184634065199",
    "pyraminx" => "t v 0.333333333333333 v 1.66666666666667",
    "tetraminx" => "t v 0.333333333333333",
    "master pyraminx" => "t v 0 v 1 v 2",
    "master tetraminx" => "t v 0 v 1",
    "professor pyraminx" => "t v -0.2 v 0.6 v 1.4 v 2.2",
    "professor tetraminx" => "t v -0.2 v 0.6 v 1.4",
    "Jing pyraminx" => "t f 0",
    "master pyramorphix" => "t e 0.866025403784437",
    "megaminx" => "d f 0.7",
    "gigaminx" => "d f 0.64 f 0.82",
    "teraminx" => "d f 0.64 f 0.76 f 0.88",
    "petaminx" => "d f 0.64 f 0.73 f 0.82 f 0.91",
    "pentultimate" => "d f 0",
    "master pentultimate" => "d f 0.1",
    "elite pentultimate" => "d f 0 f 0.145905",
    "starminx" => "d v 0.937962370425399",
    "starminx 2" => "d f 0.23606797749979",
    "pyraminx crystal" => "d f 0.447213595499989",
    "chopasaurus" => "d v 0",
    "big chop" => "d e 0",
    "skewb diamond" => "o f 0",
    "FTO" => "o f 0.333333333333333",
    "master FTO" => "o f 0.5 f 0",
    "Christopher's jewel" => "o v 0.577350269189626",
    "octastar" => "o e 0",
    "Trajber's octahedron" => "o v 0.433012701892219",
    "radio chop" => "i f 0",
    "icosamate" => "i v 0",
    "Regular Astrominx" => "i v 0.52573111211",
    "Redicosahedron" => "i v 0.794654472291766",
    "Icosaminx" => "i v 0.73",
    "Eitan's star" => "i f 0.61803398874989",
    "2x2x2 + dino" => "c f 0 v 0.577350269189626",
    "2x2x2 + little chop" => "c f 0 e 0",
    "dino + little chop" => "c v 0.577350269189626 e 0",
    "megaminx + chopasaurus" => "d f 0.61803398875 v 0",
    "starminx combo" => "d f 0.23606797749979 v 0.937962370425399",
};

/// Looks a puzzle up by name, ignoring case and treating `_` as a space
#[must_use]
pub fn puzzle_description(name: &str) -> Option<&'static str> {
    if let Some(&description) = PUZZLES.get(name) {
        return Some(description);
    }
    let name = name.replace('_', " ");
    PUZZLES
        .entries()
        .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        .map(|(_, description)| *description)
}

type Net = &'static [&'static [&'static str]];

static TETRAHEDRON_NET: Net = &[&["F", "D", "L", "R"]];
static CUBE_NET: Net = &[&["F", "D", "L", "U", "R"], &["R", "F", "", "B", ""]];
static OCTAHEDRON_NET: Net = &[
    &["F", "D", "L", "R"],
    &["D", "F", "BR", ""],
    &["BR", "D", "", "BB"],
    &["BB", "BR", "U", "BL"],
];
static DODECAHEDRON_NET: Net = &[
    &["U", "F", "", "", "", ""],
    &["F", "U", "R", "C", "A", "L"],
    &["R", "F", "", "", "E", ""],
    &["E", "R", "", "BF", "", ""],
    &["BF", "E", "BR", "BL", "I", "D"],
];
static ICOSAHEDRON_NET: Net = &[
    &["R", "C", "F", "E"],
    &["F", "R", "L", "U"],
    &["L", "F", "A", ""],
    &["E", "R", "G", "I"],
    &["I", "E", "S", "H"],
    &["S", "I", "J", "B"],
    &["B", "S", "K", "D"],
    &["K", "B", "M", "O"],
    &["O", "K", "P", "N"],
    &["P", "O", "Q", ""],
];

/// Each row names a face, then a face adjacent to it, then the faces around
/// the first one continuing counterclockwise from the second. Empty entries
/// are skipped. The first row's first two faces anchor the walk.
pub(crate) fn net(face_count: usize) -> Option<Net> {
    match face_count {
        4 => Some(TETRAHEDRON_NET),
        6 => Some(CUBE_NET),
        8 => Some(OCTAHEDRON_NET),
        12 => Some(DODECAHEDRON_NET),
        20 => Some(ICOSAHEDRON_NET),
        _ => None,
    }
}

static TETRAHEDRON_ORDER: &[&str] = &["F", "D", "L", "R"];
static CUBE_ORDER: &[&str] = &["U", "D", "F", "B", "L", "R"];
static OCTAHEDRON_ORDER: &[&str] = &["F", "BB", "D", "U", "BR", "L", "R", "BL"];
static DODECAHEDRON_ORDER: &[&str] = &[
    "L", "E", "F", "BF", "R", "I", "U", "D", "BR", "A", "BL", "C",
];
static ICOSAHEDRON_ORDER: &[&str] = &[
    "L", "S", "E", "O", "F", "B", "I", "P", "R", "K", "U", "D", "J", "A", "Q", "H", "G", "N",
    "M", "C",
];

/// Faces in decreasing priority. Edge and vertex names start from the face
/// that comes first here.
pub(crate) fn face_order(face_count: usize) -> Option<&'static [&'static str]> {
    match face_count {
        4 => Some(TETRAHEDRON_ORDER),
        6 => Some(CUBE_ORDER),
        8 => Some(OCTAHEDRON_ORDER),
        12 => Some(DODECAHEDRON_ORDER),
        20 => Some(ICOSAHEDRON_ORDER),
        _ => None,
    }
}

/// Megaminx face names as solvers write them
pub(crate) static MEGAMINX_FACE_NAMES: &[(&str, &str)] = &[
    ("U", "U"),
    ("F", "F"),
    ("R", "R"),
    ("L", "L"),
    ("C", "FR"),
    ("A", "FL"),
    ("E", "DR"),
    ("BF", "B"),
    ("BR", "BR"),
    ("BL", "BL"),
    ("I", "DL"),
    ("D", "D"),
];

/// Face-turning octahedron face names as solvers write them
pub(crate) static FTO_FACE_NAMES: &[(&str, &str)] = &[
    ("F", "F"),
    ("R", "D"),
    ("D", "L"),
    ("BR", "BL"),
    ("L", "R"),
    ("BL", "U"),
    ("U", "BR"),
    ("BB", "B"),
];
