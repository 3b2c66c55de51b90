//! Built-in Singapore MRT/LRT network dataset.
//!
//! Six heavy-rail MRT lines, the Changi Airport branch, and three LRT loop
//! shuttles, with inter-station travel times derived from published first
//! train timings. Station coordinates double as the track polyline; a
//! deployment with high-resolution track GeoJSON can replace
//! `detailed_path` per line without touching the rest of the dataset.

use crate::loader::NetworkData;
use railviz_core::depot::{Depot, DepotBook, DepotConnection};
use railviz_core::engine::SimulationEngine;
use railviz_core::geo::GeoPoint;
use railviz_core::line::{LineGeometry, Network, Station};
use railviz_core::schedule::{FrequencyRule, LineSchedule, ScheduleBook, TravelTimeTable};

/// (code, name, lat, lng)
type StationRow = (&'static str, &'static str, f64, f64);

fn build_line(
    code: &str,
    name: &str,
    color: &str,
    rows: &[StationRow],
    loop_path: Option<&[&str]>,
) -> LineGeometry {
    let stations: Vec<Station> = rows
        .iter()
        .map(|&(code, name, lat, lng)| Station {
            code: code.to_string(),
            name: name.to_string(),
            lat,
            lng,
        })
        .collect();
    let loop_path: Option<Vec<String>> =
        loop_path.map(|codes| codes.iter().map(|c| c.to_string()).collect());

    // The traversal polyline doubles as track geometry: one vertex per
    // traversal stop, so loop revisits produce repeated occurrences.
    let line = LineGeometry {
        code: code.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        stations,
        loop_path,
        detailed_path: Vec::new(),
    };
    let detailed_path: Vec<GeoPoint> = line
        .traversal_stations()
        .iter()
        .map(Station::point)
        .collect();
    LineGeometry {
        detailed_path,
        ..line
    }
}

// ===========================================================================
// Lines
// ===========================================================================

const NS_STATIONS: &[StationRow] = &[
    ("NS1", "Jurong East", 1.3329, 103.7422),
    ("NS2", "Bukit Batok", 1.3490, 103.7495),
    ("NS3", "Bukit Gombak", 1.3587, 103.7519),
    ("NS4", "Choa Chu Kang", 1.38551, 103.74425),
    ("NS5", "Yew Tee", 1.3973, 103.7475),
    ("NS7", "Kranji", 1.4251, 103.7620),
    ("NS8", "Marsiling", 1.4326, 103.7740),
    ("NS9", "Woodlands", 1.4370, 103.7865),
    ("NS10", "Admiralty", 1.4406, 103.8009),
    ("NS11", "Sembawang", 1.4491, 103.8200),
    ("NS12", "Canberra", 1.4431, 103.8296),
    ("NS13", "Yishun", 1.4294, 103.8350),
    ("NS14", "Khatib", 1.4174, 103.8329),
    ("NS15", "Yio Chu Kang", 1.3818, 103.8449),
    ("NS16", "Ang Mo Kio", 1.3700, 103.8495),
    ("NS17", "Bishan", 1.3511, 103.8485),
    ("NS18", "Braddell", 1.3404, 103.8468),
    ("NS19", "Toa Payoh", 1.3327, 103.8471),
    ("NS20", "Novena", 1.3204, 103.8438),
    ("NS21", "Newton", 1.3138, 103.8378),
    ("NS22", "Orchard", 1.3043, 103.8321),
    ("NS23", "Somerset", 1.3006, 103.8388),
    ("NS24", "Dhoby Ghaut", 1.2991, 103.8458),
    ("NS25", "City Hall", 1.2931, 103.8520),
    ("NS26", "Raffles Place", 1.2840, 103.8515),
    ("NS27", "Marina Bay", 1.2766, 103.8545),
    ("NS28", "Marina South Pier", 1.2714, 103.8635),
];

const EW_STATIONS: &[StationRow] = &[
    ("EW1", "Pasir Ris", 1.3730, 103.9493),
    ("EW2", "Tampines", 1.3526, 103.9453),
    ("EW3", "Simei", 1.3433, 103.9532),
    ("EW4", "Tanah Merah", 1.3272, 103.9463),
    ("EW5", "Bedok", 1.3240, 103.9300),
    ("EW6", "Kembangan", 1.3209, 103.9129),
    ("EW7", "Eunos", 1.3199, 103.9030),
    ("EW8", "Paya Lebar", 1.3176, 103.8928),
    ("EW9", "Aljunied", 1.3164, 103.8829),
    ("EW10", "Kallang", 1.3114, 103.8714),
    ("EW11", "Lavender", 1.3073, 103.8631),
    ("EW12", "Bugis", 1.3009, 103.8560),
    ("EW13", "City Hall", 1.2931, 103.8520),
    ("EW14", "Raffles Place", 1.2840, 103.8515),
    ("EW15", "Tanjong Pagar", 1.2766, 103.8468),
    ("EW16", "Outram Park", 1.2804, 103.8394),
    ("EW17", "Tiong Bahru", 1.2861, 103.8270),
    ("EW18", "Redhill", 1.2894, 103.8168),
    ("EW19", "Queenstown", 1.2946, 103.8060),
    ("EW20", "Commonwealth", 1.3024, 103.7984),
    ("EW21", "Buona Vista", 1.3074, 103.7901),
    ("EW22", "Dover", 1.3114, 103.7787),
    ("EW23", "Clementi", 1.3151, 103.7653),
    ("EW24", "Jurong East", 1.3329, 103.7422),
    ("EW25", "Chinese Garden", 1.3423, 103.7325),
    ("EW26", "Lakeside", 1.3444, 103.7210),
    ("EW27", "Boon Lay", 1.3387, 103.7060),
    ("EW28", "Pioneer", 1.3375, 103.6973),
    ("EW29", "Joo Koon", 1.3275, 103.6782),
    ("EW30", "Gul Circle", 1.3194, 103.6605),
    ("EW31", "Tuas Crescent", 1.3210, 103.6492),
    ("EW32", "Tuas West Road", 1.3300, 103.6397),
    ("EW33", "Tuas Link", 1.3403, 103.6368),
];

const NE_STATIONS: &[StationRow] = &[
    ("NE1", "HarbourFront", 1.2654, 103.8209),
    ("NE3", "Outram Park", 1.2804, 103.8394),
    ("NE4", "Chinatown", 1.2847, 103.8444),
    ("NE5", "Clarke Quay", 1.2886, 103.8465),
    ("NE6", "Dhoby Ghaut", 1.2991, 103.8458),
    ("NE7", "Little India", 1.3066, 103.8492),
    ("NE8", "Farrer Park", 1.3124, 103.8538),
    ("NE9", "Boon Keng", 1.3195, 103.8617),
    ("NE10", "Potong Pasir", 1.3313, 103.8687),
    ("NE11", "Woodleigh", 1.3392, 103.8709),
    ("NE12", "Serangoon", 1.3497, 103.8734),
    ("NE13", "Kovan", 1.3600, 103.8850),
    ("NE14", "Hougang", 1.3715, 103.8926),
    ("NE15", "Buangkok", 1.3831, 103.8930),
    ("NE16", "Sengkang", 1.39178, 103.89549),
    ("NE17", "Punggol", 1.40537, 103.90230),
];

const CC_STATIONS: &[StationRow] = &[
    ("CC1", "Dhoby Ghaut", 1.2991, 103.8458),
    ("CC2", "Bras Basah", 1.2970, 103.8508),
    ("CC3", "Esplanade", 1.2937, 103.8554),
    ("CC4", "Promenade", 1.2930, 103.8610),
    ("CC5", "Nicoll Highway", 1.2999, 103.8636),
    ("CC6", "Stadium", 1.3028, 103.8754),
    ("CC7", "Mountbatten", 1.3060, 103.8825),
    ("CC8", "Dakota", 1.3084, 103.8885),
    ("CC9", "Paya Lebar", 1.3176, 103.8928),
    ("CC10", "MacPherson", 1.3267, 103.8899),
    ("CC11", "Tai Seng", 1.3360, 103.8878),
    ("CC12", "Bartley", 1.3423, 103.8800),
    ("CC13", "Serangoon", 1.3497, 103.8734),
    ("CC14", "Lorong Chuan", 1.3514, 103.8641),
    ("CC15", "Bishan", 1.3511, 103.8485),
    ("CC16", "Marymount", 1.3490, 103.8392),
    ("CC17", "Caldecott", 1.3374, 103.8395),
    ("CC19", "Botanic Gardens", 1.3224, 103.8153),
    ("CC20", "Farrer Road", 1.3177, 103.8073),
    ("CC21", "Holland Village", 1.3120, 103.7962),
    ("CC22", "Buona Vista", 1.3074, 103.7901),
    ("CC23", "one-north", 1.2996, 103.7874),
    ("CC24", "Kent Ridge", 1.2935, 103.7847),
    ("CC25", "Haw Par Villa", 1.2826, 103.7820),
    ("CC26", "Pasir Panjang", 1.2760, 103.7912),
    ("CC27", "Labrador Park", 1.2720, 103.8025),
    ("CC28", "Telok Blangah", 1.2705, 103.8098),
    ("CC29", "HarbourFront", 1.2654, 103.8209),
];

const DT_STATIONS: &[StationRow] = &[
    ("DT1", "Bukit Panjang", 1.3784, 103.7633),
    ("DT2", "Cashew", 1.3690, 103.7644),
    ("DT3", "Hillview", 1.3625, 103.7675),
    ("DT5", "Beauty World", 1.3416, 103.7760),
    ("DT6", "King Albert Park", 1.3356, 103.7830),
    ("DT7", "Sixth Avenue", 1.3307, 103.7973),
    ("DT8", "Tan Kah Kee", 1.3259, 103.8073),
    ("DT9", "Botanic Gardens", 1.3224, 103.8153),
    ("DT10", "Stevens", 1.3200, 103.8260),
    ("DT11", "Newton", 1.3138, 103.8378),
    ("DT12", "Little India", 1.3066, 103.8492),
    ("DT13", "Rochor", 1.3037, 103.8526),
    ("DT14", "Bugis", 1.3009, 103.8560),
    ("DT15", "Promenade", 1.2930, 103.8610),
    ("DT16", "Bayfront", 1.2815, 103.8590),
    ("DT17", "Downtown", 1.2794, 103.8527),
    ("DT18", "Telok Ayer", 1.2821, 103.8486),
    ("DT19", "Chinatown", 1.2847, 103.8444),
    ("DT20", "Fort Canning", 1.2924, 103.8443),
    ("DT21", "Bencoolen", 1.2985, 103.8500),
    ("DT22", "Jalan Besar", 1.3054, 103.8554),
    ("DT23", "Bendemeer", 1.3138, 103.8630),
    ("DT24", "Geylang Bahru", 1.3215, 103.8715),
    ("DT25", "Mattar", 1.3268, 103.8830),
    ("DT26", "MacPherson", 1.3267, 103.8899),
    ("DT27", "Ubi", 1.3299, 103.9000),
    ("DT28", "Kaki Bukit", 1.3350, 103.9086),
    ("DT29", "Bedok North", 1.3346, 103.9180),
    ("DT30", "Bedok Reservoir", 1.3364, 103.9322),
    ("DT31", "Tampines West", 1.3456, 103.9383),
    ("DT32", "Tampines", 1.3526, 103.9453),
    ("DT33", "Tampines East", 1.3561, 103.9545),
    ("DT34", "Upper Changi", 1.3413, 103.9614),
    ("DT35", "Expo", 1.3351, 103.9615),
];

const TE_STATIONS: &[StationRow] = &[
    ("TE1", "Woodlands North", 1.4485, 103.7850),
    ("TE2", "Woodlands", 1.4370, 103.7865),
    ("TE3", "Woodlands South", 1.4270, 103.7935),
    ("TE4", "Springleaf", 1.3975, 103.8186),
    ("TE5", "Lentor", 1.3848, 103.8364),
    ("TE6", "Mayflower", 1.3718, 103.8380),
    ("TE7", "Bright Hill", 1.3621, 103.8332),
    ("TE8", "Upper Thomson", 1.3540, 103.8330),
    ("TE9", "Caldecott", 1.3374, 103.8395),
    ("TE11", "Stevens", 1.3200, 103.8260),
    ("TE12", "Napier", 1.3068, 103.8220),
    ("TE13", "Orchard Boulevard", 1.3022, 103.8285),
    ("TE14", "Orchard", 1.3043, 103.8321),
    ("TE15", "Great World", 1.2933, 103.8357),
    ("TE16", "Havelock", 1.2871, 103.8380),
    ("TE17", "Outram Park", 1.2804, 103.8394),
    ("TE18", "Maxwell", 1.2800, 103.8457),
    ("TE19", "Shenton Way", 1.2762, 103.8487),
    ("TE20", "Marina Bay", 1.2766, 103.8545),
    ("TE22", "Gardens by the Bay", 1.2794, 103.8690),
    ("TE23", "Tanjong Rhu", 1.2936, 103.8730),
    ("TE24", "Katong Park", 1.2970, 103.8850),
    ("TE25", "Tanjong Katong", 1.3050, 103.8940),
    ("TE26", "Marine Parade", 1.3020, 103.9055),
    ("TE27", "Marine Terrace", 1.3065, 103.9135),
    ("TE28", "Siglap", 1.3110, 103.9230),
    ("TE29", "Bayshore", 1.3140, 103.9390),
];

const CG_STATIONS: &[StationRow] = &[
    ("CG", "Tanah Merah", 1.3272, 103.9463),
    ("CG1", "Expo", 1.3351, 103.9615),
    ("CG2", "Changi Airport", 1.3574, 103.9884),
];

const BP_STATIONS: &[StationRow] = &[
    ("BP1", "Choa Chu Kang", 1.38551, 103.74425),
    ("BP2", "South View", 1.38031, 103.74522),
    ("BP3", "Keat Hong", 1.37867, 103.74893),
    ("BP4", "Teck Whye", 1.37687, 103.75294),
    ("BP5", "Phoenix", 1.37848, 103.75762),
    ("BP6", "Bukit Panjang", 1.3784, 103.7633),
    ("BP7", "Petir", 1.37773, 103.76715),
    ("BP8", "Pending", 1.37597, 103.77138),
    ("BP9", "Bangkit", 1.38003, 103.77263),
    ("BP10", "Fajar", 1.38454, 103.77083),
    ("BP11", "Segar", 1.38768, 103.76951),
    ("BP12", "Jelapang", 1.38646, 103.76427),
    ("BP13", "Senja", 1.38272, 103.76240),
];

// Out along the spine, around the hillside loop, back to Choa Chu Kang.
const BP_LOOP: &[&str] = &[
    "BP1", "BP2", "BP3", "BP4", "BP5", "BP6", "BP7", "BP8", "BP9", "BP10", "BP11", "BP12",
    "BP13", "BP6", "BP5", "BP4", "BP3", "BP2", "BP1",
];

const SK_STATIONS: &[StationRow] = &[
    ("STC", "Sengkang", 1.39178, 103.89549),
    ("SW1", "Cheng Lim", 1.39633, 103.89381),
    ("SW2", "Farmway", 1.39720, 103.88880),
    ("SW3", "Kupang", 1.39852, 103.88126),
    ("SW4", "Thanggam", 1.39728, 103.87556),
    ("SW5", "Fernvale", 1.39194, 103.87615),
    ("SW6", "Layar", 1.39223, 103.88002),
    ("SW7", "Tongkang", 1.38952, 103.88559),
    ("SW8", "Renjong", 1.38660, 103.89028),
    ("SE1", "Compassvale", 1.39461, 103.90015),
    ("SE2", "Rumbia", 1.39107, 103.90563),
    ("SE3", "Bakau", 1.38830, 103.90532),
    ("SE4", "Kangkar", 1.38378, 103.90255),
    ("SE5", "Ranggung", 1.38367, 103.89716),
];

// Figure-8: west loop then east loop, both anchored at the town centre.
const SK_LOOP: &[&str] = &[
    "STC", "SW1", "SW2", "SW3", "SW4", "SW5", "SW6", "SW7", "SW8", "STC", "STC", "SE1", "SE2",
    "SE3", "SE4", "SE5", "STC",
];

const PG_STATIONS: &[StationRow] = &[
    ("PTC", "Punggol", 1.40537, 103.90230),
    ("PW1", "Sam Kee", 1.40976, 103.90489),
    ("PW2", "Teck Lee", 1.41280, 103.90655),
    ("PW3", "Punggol Point", 1.41781, 103.90679),
    ("PW4", "Samudera", 1.41600, 103.90220),
    ("PW5", "Nibong", 1.41156, 103.90028),
    ("PW6", "Sumang", 1.40869, 103.89859),
    ("PW7", "Soo Teck", 1.40545, 103.89720),
    ("PE1", "Cove", 1.39921, 103.90629),
    ("PE2", "Meridian", 1.39698, 103.90909),
    ("PE3", "Coral Edge", 1.39371, 103.91259),
    ("PE4", "Riviera", 1.39455, 103.91636),
    ("PE5", "Kadaloor", 1.39919, 103.91671),
    ("PE6", "Oasis", 1.40210, 103.91268),
    ("PE7", "Damai", 1.40532, 103.90837),
];

const PG_LOOP: &[&str] = &[
    "PTC", "PW1", "PW2", "PW3", "PW4", "PW5", "PW6", "PW7", "PTC", "PTC", "PE1", "PE2", "PE3",
    "PE4", "PE5", "PE6", "PE7", "PTC",
];

const LRT_COLOR: &str = "#748477";

/// The full network geometry.
pub fn network() -> Network {
    let mut network = Network::new();
    network.insert(build_line("NS", "North-South Line", "#D42E12", NS_STATIONS, None));
    network.insert(build_line("EW", "East-West Line", "#009645", EW_STATIONS, None));
    network.insert(build_line("NE", "North-East Line", "#9900AA", NE_STATIONS, None));
    network.insert(build_line("CC", "Circle Line", "#FA9E0D", CC_STATIONS, None));
    network.insert(build_line("DT", "Downtown Line", "#005EC4", DT_STATIONS, None));
    network.insert(build_line("TE", "Thomson-East Coast Line", "#9D5B25", TE_STATIONS, None));
    network.insert(build_line("CG", "Changi Airport Line", "#009645", CG_STATIONS, None));
    network.insert(build_line("BP", "Bukit Panjang LRT", LRT_COLOR, BP_STATIONS, Some(BP_LOOP)));
    network.insert(build_line("SK", "Sengkang LRT", LRT_COLOR, SK_STATIONS, Some(SK_LOOP)));
    network.insert(build_line("PG", "Punggol LRT", LRT_COLOR, PG_STATIONS, Some(PG_LOOP)));
    network
}

// ===========================================================================
// Schedules
// ===========================================================================

/// Operating schedules: 05:30 to midnight across the network, with smaller
/// fleets and shorter dwells on the LRT shuttles.
pub fn schedules() -> ScheduleBook {
    let mut book = ScheduleBook::default();

    let mrt = |max_fleet: u32| LineSchedule {
        start_time: 330.0,
        end_time: 1440.0,
        dwell_secs: None,
        max_fleet,
        frequency: None,
    };
    let lrt = |max_fleet: u32| LineSchedule {
        start_time: 330.0,
        end_time: 1440.0,
        dwell_secs: Some(20.0),
        max_fleet,
        frequency: Some(FrequencyRule {
            peak: 3.5,
            off_peak: 7.0,
            late_night: 10.0,
        }),
    };

    book.lines.insert("NS".into(), mrt(45));
    book.lines.insert("EW".into(), mrt(55));
    book.lines.insert("NE".into(), mrt(35));
    book.lines.insert("CC".into(), mrt(40));
    book.lines.insert("DT".into(), mrt(45));
    book.lines.insert("TE".into(), mrt(40));
    // The airport branch runs a short shuttle with a small dedicated fleet.
    book.lines.insert(
        "CG".into(),
        LineSchedule {
            start_time: 330.0,
            end_time: 1440.0,
            dwell_secs: None,
            max_fleet: 8,
            frequency: Some(FrequencyRule {
                peak: 6.0,
                off_peak: 9.0,
                late_night: 12.0,
            }),
        },
    );
    book.lines.insert("BP".into(), lrt(14));
    book.lines.insert("SK".into(), lrt(16));
    book.lines.insert("PG".into(), lrt(16));
    book
}

// ===========================================================================
// Travel times
// ===========================================================================

/// Inter-station travel times in minutes, derived from published first
/// train timings. One entry per hop in station order; LRT lines use the
/// global default segment time.
pub fn travel_times() -> TravelTimeTable {
    let mut table = TravelTimeTable::default();
    let entries: &[(&str, &[f64])] = &[
        (
            "NS",
            &[
                2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 4.0, 1.0, 2.0, 2.0, 5.0, 3.0, 2.0, 2.0,
                2.0, 3.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0,
            ],
        ),
        (
            "EW",
            &[
                2.0, 2.0, 3.0, 3.0, 3.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0,
                2.0, 2.0, 2.0, 2.0, 2.0, 3.0, 2.0, 2.0, 2.0, 2.0, 2.0, 4.0, 3.0, 2.0, 2.0, 2.0,
            ],
        ),
        (
            "NE",
            &[2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 3.0, 2.0, 2.0, 2.0, 3.0, 2.0, 2.0, 2.0],
        ),
        (
            "CC",
            &[
                2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 3.0,
                2.0, 2.0, 3.0, 2.0, 2.0, 2.0, 3.0, 2.0, 2.0, 2.0, 2.0,
            ],
        ),
        (
            "DT",
            &[
                2.0, 2.0, 3.0, 2.0, 3.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0,
                2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0,
                2.0,
            ],
        ),
        (
            "TE",
            &[
                2.0, 2.0, 2.0, 3.0, 3.0, 1.0, 3.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0,
                1.0, 2.0, 2.0, 3.0, 3.0, 2.0, 2.0, 2.0, 2.0, 2.0,
            ],
        ),
        ("CG", &[2.0, 2.0]),
    ];
    for (line, segments) in entries {
        table.lines.insert((*line).to_string(), segments.to_vec());
    }
    table
}

// ===========================================================================
// Depots
// ===========================================================================

/// All nine depots with their modeled connectors.
pub fn depots() -> DepotBook {
    struct Row {
        id: &'static str,
        name: &'static str,
        coordinates: (f64, f64),
        capacity: u32,
        serves: &'static [&'static str],
        line: &'static str,
        station: &'static str,
        path: &'static [(f64, f64)],
    }

    let rows = [
        Row {
            id: "BSD",
            name: "Bishan Depot",
            coordinates: (103.8520, 1.3530),
            capacity: 50,
            serves: &["NS", "CC"],
            line: "NS",
            station: "NS17",
            path: &[(103.8520, 1.3530), (103.8500, 1.3520), (103.8485, 1.3511)],
        },
        Row {
            id: "UPD",
            name: "Ulu Pandan Depot",
            coordinates: (103.7560, 1.3260),
            capacity: 40,
            serves: &["NS", "EW"],
            line: "NS",
            station: "NS1",
            path: &[(103.7560, 1.3260), (103.7500, 1.3290), (103.7422, 1.3329)],
        },
        Row {
            id: "CHD",
            name: "Changi Depot",
            coordinates: (103.9560, 1.3380),
            capacity: 35,
            serves: &["EW"],
            line: "EW",
            station: "EW4",
            path: &[(103.9560, 1.3380), (103.9500, 1.3320), (103.9463, 1.3272)],
        },
        Row {
            id: "TWD",
            name: "Tuas Depot",
            coordinates: (103.6270, 1.3200),
            capacity: 60,
            serves: &["EW"],
            line: "EW",
            station: "EW33",
            path: &[(103.6270, 1.3200), (103.6320, 1.3300), (103.6368, 1.3403)],
        },
        Row {
            id: "SKD",
            name: "Sengkang Depot",
            coordinates: (103.8940, 1.3960),
            capacity: 50,
            serves: &["NE", "SK", "PG"],
            line: "NE",
            station: "NE16",
            path: &[(103.8940, 1.3960), (103.89549, 1.39178)],
        },
        Row {
            id: "KCD",
            name: "Kim Chuan Depot",
            coordinates: (103.8870, 1.3410),
            capacity: 70,
            serves: &["CC", "DT"],
            line: "CC",
            station: "CC11",
            path: &[(103.8870, 1.3410), (103.8878, 1.3360)],
        },
        Row {
            id: "GBD",
            name: "Gali Batu Depot",
            coordinates: (103.7590, 1.3850),
            capacity: 40,
            serves: &["DT"],
            line: "DT",
            station: "DT1",
            path: &[(103.7590, 1.3850), (103.7633, 1.3784)],
        },
        Row {
            id: "MDD",
            name: "Mandai Depot",
            coordinates: (103.7910, 1.4170),
            capacity: 90,
            serves: &["TE"],
            line: "TE",
            station: "TE3",
            path: &[(103.7910, 1.4170), (103.7935, 1.4270)],
        },
        Row {
            id: "BPD",
            name: "Ten Mile Junction Depot",
            coordinates: (103.7600, 1.3800),
            capacity: 32,
            serves: &["BP"],
            line: "BP",
            station: "BP6",
            path: &[(103.7600, 1.3800), (103.7633, 1.3784)],
        },
    ];

    let mut book = DepotBook::default();
    for row in rows {
        book.depots.insert(
            row.id.to_string(),
            Depot {
                name: row.name.to_string(),
                coordinates: GeoPoint::new(row.coordinates.0, row.coordinates.1),
                capacity: row.capacity,
                serves_lines: row.serves.iter().map(|s| s.to_string()).collect(),
                connection: DepotConnection {
                    line: row.line.to_string(),
                    station_code: row.station.to_string(),
                    path: row
                        .path
                        .iter()
                        .map(|&(lng, lat)| GeoPoint::new(lng, lat))
                        .collect(),
                },
            },
        );
    }
    book
}

/// The complete dataset bundle.
pub fn dataset() -> NetworkData {
    NetworkData {
        network: network(),
        schedules: schedules(),
        travel_times: travel_times(),
        depots: depots(),
    }
}

/// A ready-to-query engine over the Singapore network.
pub fn engine() -> SimulationEngine {
    let data = dataset();
    SimulationEngine::new(data.network, data.schedules, data.travel_times, data.depots)
}

/// Like [`engine`] with a fixed RNG seed.
pub fn engine_with_seed(seed: u64) -> SimulationEngine {
    let data = dataset();
    SimulationEngine::with_seed(
        data.network,
        data.schedules,
        data.travel_times,
        data.depots,
        seed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_counts_match_published_network() {
        let network = network();
        let count = |code: &str| network.get(code).unwrap().stations.len();
        assert_eq!(count("NS"), 27);
        assert_eq!(count("EW"), 33);
        assert_eq!(count("NE"), 16);
        assert_eq!(count("CC"), 28);
        assert_eq!(count("DT"), 34);
        assert_eq!(count("TE"), 27);
        assert_eq!(count("CG"), 3);
        assert_eq!(count("BP"), 13);
        assert_eq!(count("SK"), 14);
        assert_eq!(count("PG"), 15);
    }

    #[test]
    fn loop_paths_resolve_fully() {
        let network = network();
        for code in ["BP", "SK", "PG"] {
            let line = network.get(code).unwrap();
            let loop_path = line.loop_path.as_ref().unwrap();
            let traversal = line.traversal_stations();
            assert_eq!(
                traversal.len(),
                loop_path.len(),
                "every loop stop of {code} must resolve"
            );
        }
        // The BP loop runs out and back through Bukit Panjang.
        assert_eq!(network.get("BP").unwrap().traversal_stations().len(), 19);
    }

    #[test]
    fn travel_time_arrays_cover_every_segment() {
        let network = network();
        let table = travel_times();
        for code in ["NS", "EW", "NE", "CC", "DT", "TE", "CG"] {
            let segments = network.get(code).unwrap().traversal_stations().len() - 1;
            let times = &table.lines[code];
            assert!(
                times.len() >= segments,
                "{code}: {} entries for {segments} segments",
                times.len()
            );
        }
    }

    #[test]
    fn ns_travel_times_sum_to_published_total() {
        let table = travel_times();
        let sum: f64 = table.lines["NS"].iter().sum();
        assert_eq!(table.lines["NS"].len(), 26);
        assert!((sum - 58.0).abs() < 1e-12);
    }

    #[test]
    fn every_line_has_a_schedule() {
        let network = network();
        let book = schedules();
        for code in network.lines.keys() {
            assert!(book.line(code).is_some(), "no schedule for {code}");
        }
    }

    #[test]
    fn depot_connectors_resolve_against_network() {
        let network = network();
        for (id, depot) in &depots().depots {
            let line = network
                .get(&depot.connection.line)
                .unwrap_or_else(|| panic!("{id}: unknown connector line"));
            assert!(
                line.stations
                    .iter()
                    .any(|s| s.code == depot.connection.station_code),
                "{id}: connector station missing on {}",
                depot.connection.line
            );
            for served in &depot.serves_lines {
                assert!(network.get(served).is_some(), "{id}: serves unknown {served}");
            }
            assert!(depot.connection.path.len() >= 2);
        }
    }

    #[test]
    fn dataset_validates_clean() {
        let data = dataset();
        let issues = railviz_core::validation::validate(
            &data.network,
            &data.schedules,
            &data.travel_times,
            &data.depots,
        );
        assert!(issues.is_empty(), "dataset issues: {issues:?}");
    }

    #[test]
    fn every_served_line_can_source_trains() {
        let book = depots();
        for code in ["NS", "EW", "NE", "CC", "DT", "TE", "BP", "SK", "PG"] {
            assert!(!book.serving(code).is_empty(), "no depot serves {code}");
        }
        // SK and PG are stabled at SKD whose connector joins NE, and CG has
        // no depot at all; those lines spawn trains directly onto the
        // track, which is the designed fallback.
        assert!(book.serving("CG").is_empty());
        assert!(book.connector_at("SK", "STC").is_none());
    }
}
