//! Built-in sample tables: 2024 estimates compiled from IMF, World Bank and
//! COMCEC publications. Each call builds a fresh record set.

use crate::error::Result;
use crate::loader::DEBT_RATIO_METRIC;
use crate::types::Record;

pub const GDP_METRIC: &str = "GDP (USD Billion)";
pub const TOTAL_DEBT_METRIC: &str = "Total Debt (USD Billion)";
pub const INFLATION_METRIC: &str = "Inflation Rate (%)";
pub const RESERVES_METRIC: &str = "Forex Reserves (USD Billion)";

/// Largest economies plus the OIC bloc: GDP, total debt, debt ratio.
pub fn major_economies_2024() -> Result<Vec<Record>> {
    const ROWS: [(&str, f64, f64, f64); 11] = [
        ("United States", 28780.0, 35000.0, 123.0),
        ("China", 19400.0, 14000.0, 72.0),
        ("OIC (57 members)", 9200.0, 3500.0, 38.0),
        ("Japan", 4200.0, 11500.0, 260.0),
        ("Germany", 4590.0, 2900.0, 63.0),
        ("India", 4125.0, 3300.0, 80.0),
        ("United Kingdom", 3590.0, 3400.0, 95.0),
        ("France", 3130.0, 3400.0, 110.0),
        ("Italy", 2330.0, 3200.0, 137.0),
        ("Brazil", 2260.0, 1700.0, 75.0),
        ("Canada", 2280.0, 2400.0, 105.0),
    ];
    ROWS.iter()
        .map(|&(name, gdp, debt, ratio)| {
            Record::from_pairs(name, 2024, &[(GDP_METRIC, gdp), (TOTAL_DEBT_METRIC, debt), (DEBT_RATIO_METRIC, ratio)])
        })
        .collect()
}

/// OIC member economies. Total debt is derived as GDP * ratio / 100.
pub fn oic_members_2024() -> Result<Vec<Record>> {
    const ROWS: [(&str, f64, f64); 12] = [
        ("Indonesia", 1396.0, 38.8),
        ("Saudi Arabia", 1240.0, 26.2),
        ("Turkey", 1320.0, 24.7),
        ("Iran", 437.0, 36.8),
        ("UAE", 537.0, 31.3),
        ("Malaysia", 422.0, 70.4),
        ("Egypt", 389.0, 90.1),
        ("Bangladesh", 450.0, 21.8),
        ("Pakistan", 373.0, 72.5),
        ("Nigeria", 188.0, 46.6),
        ("Kazakhstan", 288.0, 23.4),
        ("Qatar", 218.0, 43.0),
    ];
    ROWS.iter()
        .map(|&(name, gdp, ratio)| {
            Record::from_pairs(
                name,
                2024,
                &[(GDP_METRIC, gdp), (DEBT_RATIO_METRIC, ratio), (TOTAL_DEBT_METRIC, gdp * ratio / 100.0)],
            )
        })
        .collect()
}

/// Bangladesh yearly series, 2020-2025.
pub fn bangladesh_history() -> Result<Vec<Record>> {
    const ROWS: [(i32, f64, f64, f64, f64); 6] = [
        (2020, 374.0, 5.6, 34.5, 43.2),
        (2021, 416.0, 5.6, 35.6, 46.2),
        (2022, 460.0, 7.7, 37.9, 33.7),
        (2023, 437.0, 9.0, 39.7, 21.9),
        (2024, 450.0, 10.3, 41.0, 21.4),
        (2025, 475.0, 8.5, 40.3, 26.7),
    ];
    ROWS.iter()
        .map(|&(year, gdp, inflation, ratio, reserves)| {
            Record::from_pairs(
                "Bangladesh",
                year,
                &[
                    (GDP_METRIC, gdp),
                    (INFLATION_METRIC, inflation),
                    (DEBT_RATIO_METRIC, ratio),
                    (RESERVES_METRIC, reserves),
                ],
            )
        })
        .collect()
}

/// Debt-to-GDP ratio by country (ISO 3166 alpha-3 code, name, ratio).
const GLOBAL_DEBT_RATIOS: &[(&str, &str, f64)] = &[
    ("AFG", "Afghanistan", 9.0),
    ("ALB", "Albania", 60.0),
    ("DZA", "Algeria", 48.0),
    ("AGO", "Angola", 70.0),
    ("ARG", "Argentina", 85.0),
    ("ARM", "Armenia", 49.0),
    ("AUS", "Australia", 49.0),
    ("AUT", "Austria", 78.0),
    ("AZE", "Azerbaijan", 21.0),
    ("BHS", "Bahamas", 85.0),
    ("BHR", "Bahrain", 120.0),
    ("BGD", "Bangladesh", 40.0),
    ("BRB", "Barbados", 115.0),
    ("BLR", "Belarus", 40.0),
    ("BEL", "Belgium", 105.0),
    ("BLZ", "Belize", 66.0),
    ("BEN", "Benin", 53.0),
    ("BTN", "Bhutan", 110.0),
    ("BOL", "Bolivia", 80.0),
    ("BIH", "Bosnia and Herzegovina", 28.0),
    ("BWA", "Botswana", 20.0),
    ("BRA", "Brazil", 88.0),
    ("BRN", "Brunei", 2.5),
    ("BGR", "Bulgaria", 23.0),
    ("BFA", "Burkina Faso", 55.0),
    ("BDI", "Burundi", 60.0),
    ("CPV", "Cabo Verde", 115.0),
    ("KHM", "Cambodia", 26.0),
    ("CMR", "Cameroon", 42.0),
    ("CAN", "Canada", 106.0),
    ("CAF", "Central African Republic", 50.0),
    ("TCD", "Chad", 40.0),
    ("CHL", "Chile", 38.0),
    ("CHN", "China", 83.0),
    ("COL", "Colombia", 55.0),
    ("COM", "Comoros", 30.0),
    ("COD", "Congo, Dem. Rep.", 23.0),
    ("COG", "Congo, Rep.", 95.0),
    ("CRI", "Costa Rica", 60.0),
    ("CIV", "Cote d'Ivoire", 58.0),
    ("HRV", "Croatia", 62.0),
    ("CUB", "Cuba", 110.0),
    ("CYP", "Cyprus", 75.0),
    ("CZE", "Czech Republic", 44.0),
    ("DNK", "Denmark", 30.0),
    ("DJI", "Djibouti", 40.0),
    ("DMA", "Dominica", 100.0),
    ("DOM", "Dominican Republic", 59.0),
    ("ECU", "Ecuador", 55.0),
    ("EGY", "Egypt", 92.0),
    ("SLV", "El Salvador", 80.0),
    ("GNQ", "Equatorial Guinea", 35.0),
    ("ERI", "Eritrea", 175.0),
    ("EST", "Estonia", 20.0),
    ("ETH", "Ethiopia", 35.0),
    ("FJI", "Fiji", 85.0),
    ("FIN", "Finland", 75.0),
    ("FRA", "France", 111.0),
    ("GAB", "Gabon", 65.0),
    ("GMB", "Gambia, The", 77.0),
    ("GEO", "Georgia", 40.0),
    ("DEU", "Germany", 63.0),
    ("GHA", "Ghana", 85.0),
    ("GRC", "Greece", 159.0),
    ("GRD", "Grenada", 70.0),
    ("GTM", "Guatemala", 28.0),
    ("GIN", "Guinea", 40.0),
    ("GNB", "Guinea-Bissau", 78.0),
    ("GUY", "Guyana", 28.0),
    ("HTI", "Haiti", 25.0),
    ("HND", "Honduras", 47.0),
    ("HKG", "Hong Kong SAR", 6.0),
    ("HUN", "Hungary", 75.0),
    ("ISL", "Iceland", 65.0),
    ("IND", "India", 82.0),
    ("IDN", "Indonesia", 39.0),
    ("IRN", "Iran", 35.0),
    ("IRQ", "Iraq", 45.0),
    ("IRL", "Ireland", 43.0),
    ("ISR", "Israel", 62.0),
    ("ITA", "Italy", 137.0),
    ("JAM", "Jamaica", 75.0),
    ("JPN", "Japan", 255.0),
    ("JOR", "Jordan", 90.0),
    ("KAZ", "Kazakhstan", 24.0),
    ("KEN", "Kenya", 70.0),
    ("KIR", "Kiribati", 15.0),
    ("KWT", "Kuwait", 3.5),
    ("KGZ", "Kyrgyz Republic", 50.0),
    ("LAO", "Lao PDR", 120.0),
    ("LVA", "Latvia", 42.0),
    ("LBN", "Lebanon", 280.0),
    ("LSO", "Lesotho", 60.0),
    ("LBR", "Liberia", 55.0),
    ("LBY", "Libya", 60.0),
    ("LTU", "Lithuania", 37.0),
    ("LUX", "Luxembourg", 28.0),
    ("MDG", "Madagascar", 45.0),
    ("MWI", "Malawi", 75.0),
    ("MYS", "Malaysia", 65.0),
    ("MDV", "Maldives", 115.0),
    ("MLI", "Mali", 50.0),
    ("MLT", "Malta", 55.0),
    ("MHL", "Marshall Islands", 20.0),
    ("MRT", "Mauritania", 50.0),
    ("MUS", "Mauritius", 80.0),
    ("MEX", "Mexico", 52.0),
    ("FSM", "Micronesia", 15.0),
    ("MDA", "Moldova", 35.0),
    ("MNG", "Mongolia", 60.0),
    ("MNE", "Montenegro", 70.0),
    ("MAR", "Morocco", 70.0),
    ("MOZ", "Mozambique", 100.0),
    ("MMR", "Myanmar", 60.0),
    ("NAM", "Namibia", 68.0),
    ("NRU", "Nauru", 25.0),
    ("NPL", "Nepal", 45.0),
    ("NLD", "Netherlands", 48.0),
    ("NZL", "New Zealand", 45.0),
    ("NIC", "Nicaragua", 45.0),
    ("NER", "Niger", 50.0),
    ("NGA", "Nigeria", 40.0),
    ("MKD", "North Macedonia", 52.0),
    ("NOR", "Norway", 40.0),
    ("OMN", "Oman", 40.0),
    ("PAK", "Pakistan", 75.0),
    ("PLW", "Palau", 30.0),
    ("PAN", "Panama", 55.0),
    ("PNG", "Papua New Guinea", 50.0),
    ("PRY", "Paraguay", 40.0),
    ("PER", "Peru", 33.0),
    ("PHL", "Philippines", 60.0),
    ("POL", "Poland", 52.0),
    ("PRT", "Portugal", 100.0),
    ("QAT", "Qatar", 42.0),
    ("ROU", "Romania", 50.0),
    ("RUS", "Russia", 20.0),
    ("RWA", "Rwanda", 65.0),
    ("WSM", "Samoa", 45.0),
    ("SMR", "San Marino", 80.0),
    ("STP", "Sao Tome and Principe", 55.0),
    ("SAU", "Saudi Arabia", 27.0),
    ("SEN", "Senegal", 75.0),
    ("SRB", "Serbia", 52.0),
    ("SYC", "Seychelles", 60.0),
    ("SLE", "Sierra Leone", 90.0),
    ("SGP", "Singapore", 168.0),
    ("SVK", "Slovak Republic", 58.0),
    ("SVN", "Slovenia", 70.0),
    ("SLB", "Solomon Islands", 15.0),
    ("SOM", "Somalia", 10.0),
    ("ZAF", "South Africa", 74.0),
    ("SSD", "South Sudan", 40.0),
    ("ESP", "Spain", 107.0),
    ("LKA", "Sri Lanka", 105.0),
    ("KNA", "St. Kitts and Nevis", 55.0),
    ("LCA", "St. Lucia", 75.0),
    ("VCT", "St. Vincent and the Grenadines", 80.0),
    ("SDN", "Sudan", 250.0),
    ("SUR", "Suriname", 90.0),
    ("SWE", "Sweden", 33.0),
    ("CHE", "Switzerland", 38.0),
    ("SYR", "Syria", 80.0),
    ("TWN", "Taiwan", 25.0),
    ("TJK", "Tajikistan", 35.0),
    ("TZA", "Tanzania", 45.0),
    ("THA", "Thailand", 62.0),
    ("TLS", "Timor-Leste", 15.0),
    ("TGO", "Togo", 60.0),
    ("TON", "Tonga", 45.0),
    ("TTO", "Trinidad and Tobago", 55.0),
    ("TUN", "Tunisia", 80.0),
    ("TUR", "Turkey", 32.0),
    ("TKM", "Turkmenistan", 8.0),
    ("TUV", "Tuvalu", 10.0),
    ("UGA", "Uganda", 50.0),
    ("UKR", "Ukraine", 85.0),
    ("ARE", "United Arab Emirates", 30.0),
    ("GBR", "United Kingdom", 104.0),
    ("USA", "United States", 123.0),
    ("URY", "Uruguay", 65.0),
    ("UZB", "Uzbekistan", 35.0),
    ("VUT", "Vanuatu", 45.0),
    ("VEN", "Venezuela", 150.0),
    ("VNM", "Vietnam", 37.0),
    ("YEM", "Yemen", 70.0),
    ("ZMB", "Zambia", 110.0),
    ("ZWE", "Zimbabwe", 95.0),
];

/// Approximate 2023/2024 debt ratios for every country the IMF covers.
pub fn global_debt_ratios() -> Result<Vec<Record>> {
    GLOBAL_DEBT_RATIOS
        .iter()
        .map(|&(_, name, ratio)| Record::from_pairs(name, 2024, &[(DEBT_RATIO_METRIC, ratio)]))
        .collect()
}

/// Country code to name, for naming IMF series.
pub fn country_names() -> std::collections::HashMap<String, String> {
    GLOBAL_DEBT_RATIOS.iter().map(|&(code, name, _)| (code.to_string(), name.to_string())).collect()
}
