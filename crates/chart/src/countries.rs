//! The chart's built-in world country set.
//!
//! Lowercase ISO 3166-1 alpha-2 codes with World Bank style display
//! names. This set defines which countries a rendered map can show; the
//! engine classifies exactly these codes and nothing else.

use gdpmap_engine::PlotCountries;

pub const WORLD_COUNTRIES: &[(&str, &str)] = &[
    ("ad", "Andorra"),
    ("ae", "United Arab Emirates"),
    ("af", "Afghanistan"),
    ("al", "Albania"),
    ("am", "Armenia"),
    ("ao", "Angola"),
    ("aq", "Antarctica"),
    ("ar", "Argentina"),
    ("at", "Austria"),
    ("au", "Australia"),
    ("az", "Azerbaijan"),
    ("ba", "Bosnia and Herzegovina"),
    ("bd", "Bangladesh"),
    ("be", "Belgium"),
    ("bf", "Burkina Faso"),
    ("bg", "Bulgaria"),
    ("bh", "Bahrain"),
    ("bi", "Burundi"),
    ("bj", "Benin"),
    ("bn", "Brunei Darussalam"),
    ("bo", "Bolivia"),
    ("br", "Brazil"),
    ("bt", "Bhutan"),
    ("bw", "Botswana"),
    ("by", "Belarus"),
    ("bz", "Belize"),
    ("ca", "Canada"),
    ("cd", "Congo, Dem. Rep."),
    ("cf", "Central African Republic"),
    ("cg", "Congo, Rep."),
    ("ch", "Switzerland"),
    ("ci", "Cote d'Ivoire"),
    ("cl", "Chile"),
    ("cm", "Cameroon"),
    ("cn", "China"),
    ("co", "Colombia"),
    ("cr", "Costa Rica"),
    ("cu", "Cuba"),
    ("cv", "Cabo Verde"),
    ("cy", "Cyprus"),
    ("cz", "Czechia"),
    ("de", "Germany"),
    ("dj", "Djibouti"),
    ("dk", "Denmark"),
    ("do", "Dominican Republic"),
    ("dz", "Algeria"),
    ("ec", "Ecuador"),
    ("ee", "Estonia"),
    ("eg", "Egypt, Arab Rep."),
    ("eh", "Western Sahara"),
    ("er", "Eritrea"),
    ("es", "Spain"),
    ("et", "Ethiopia"),
    ("fi", "Finland"),
    ("fr", "France"),
    ("ga", "Gabon"),
    ("gb", "United Kingdom"),
    ("ge", "Georgia"),
    ("gf", "French Guiana"),
    ("gh", "Ghana"),
    ("gl", "Greenland"),
    ("gm", "Gambia, The"),
    ("gn", "Guinea"),
    ("gq", "Equatorial Guinea"),
    ("gr", "Greece"),
    ("gt", "Guatemala"),
    ("gu", "Guam"),
    ("gw", "Guinea-Bissau"),
    ("gy", "Guyana"),
    ("hk", "Hong Kong SAR, China"),
    ("hn", "Honduras"),
    ("hr", "Croatia"),
    ("ht", "Haiti"),
    ("hu", "Hungary"),
    ("id", "Indonesia"),
    ("ie", "Ireland"),
    ("il", "Israel"),
    ("in", "India"),
    ("iq", "Iraq"),
    ("ir", "Iran, Islamic Rep."),
    ("is", "Iceland"),
    ("it", "Italy"),
    ("jm", "Jamaica"),
    ("jo", "Jordan"),
    ("jp", "Japan"),
    ("ke", "Kenya"),
    ("kg", "Kyrgyz Republic"),
    ("kh", "Cambodia"),
    ("kp", "Korea, Dem. People's Rep."),
    ("kr", "Korea, Rep."),
    ("kw", "Kuwait"),
    ("kz", "Kazakhstan"),
    ("la", "Lao PDR"),
    ("lb", "Lebanon"),
    ("li", "Liechtenstein"),
    ("lk", "Sri Lanka"),
    ("lr", "Liberia"),
    ("ls", "Lesotho"),
    ("lt", "Lithuania"),
    ("lu", "Luxembourg"),
    ("lv", "Latvia"),
    ("ly", "Libya"),
    ("ma", "Morocco"),
    ("mc", "Monaco"),
    ("md", "Moldova"),
    ("me", "Montenegro"),
    ("mg", "Madagascar"),
    ("mk", "North Macedonia"),
    ("ml", "Mali"),
    ("mm", "Myanmar"),
    ("mn", "Mongolia"),
    ("mo", "Macao SAR, China"),
    ("mr", "Mauritania"),
    ("mt", "Malta"),
    ("mu", "Mauritius"),
    ("mv", "Maldives"),
    ("mw", "Malawi"),
    ("mx", "Mexico"),
    ("my", "Malaysia"),
    ("mz", "Mozambique"),
    ("na", "Namibia"),
    ("ne", "Niger"),
    ("ng", "Nigeria"),
    ("ni", "Nicaragua"),
    ("nl", "Netherlands"),
    ("no", "Norway"),
    ("np", "Nepal"),
    ("nz", "New Zealand"),
    ("om", "Oman"),
    ("pa", "Panama"),
    ("pe", "Peru"),
    ("pg", "Papua New Guinea"),
    ("ph", "Philippines"),
    ("pk", "Pakistan"),
    ("pl", "Poland"),
    ("pr", "Puerto Rico"),
    ("ps", "West Bank and Gaza"),
    ("pt", "Portugal"),
    ("py", "Paraguay"),
    ("qa", "Qatar"),
    ("re", "Reunion"),
    ("ro", "Romania"),
    ("rs", "Serbia"),
    ("ru", "Russian Federation"),
    ("rw", "Rwanda"),
    ("sa", "Saudi Arabia"),
    ("sc", "Seychelles"),
    ("sd", "Sudan"),
    ("se", "Sweden"),
    ("sg", "Singapore"),
    ("si", "Slovenia"),
    ("sk", "Slovak Republic"),
    ("sl", "Sierra Leone"),
    ("sm", "San Marino"),
    ("sn", "Senegal"),
    ("so", "Somalia"),
    ("sr", "Suriname"),
    ("st", "Sao Tome and Principe"),
    ("sv", "El Salvador"),
    ("sy", "Syrian Arab Republic"),
    ("sz", "Eswatini"),
    ("td", "Chad"),
    ("tg", "Togo"),
    ("th", "Thailand"),
    ("tj", "Tajikistan"),
    ("tl", "Timor-Leste"),
    ("tm", "Turkmenistan"),
    ("tn", "Tunisia"),
    ("tr", "Turkiye"),
    ("tt", "Trinidad and Tobago"),
    ("tw", "Taiwan, China"),
    ("tz", "Tanzania"),
    ("ua", "Ukraine"),
    ("ug", "Uganda"),
    ("us", "United States"),
    ("uy", "Uruguay"),
    ("uz", "Uzbekistan"),
    ("ve", "Venezuela, RB"),
    ("vn", "Vietnam"),
    ("ye", "Yemen, Rep."),
    ("yt", "Mayotte"),
    ("za", "South Africa"),
    ("zm", "Zambia"),
    ("zw", "Zimbabwe"),
];

/// The built-in country set as a [`PlotCountries`] map.
pub fn world_countries() -> PlotCountries {
    WORLD_COUNTRIES
        .iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect()
}
