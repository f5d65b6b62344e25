use common::Commodity;

use crate::models::{CompanyRecord, Exchange, Stage};

// (ticker, name, headline alias, commodities, stage)
const CANADIAN_MINERS: &[(&str, &str, &str, &[Commodity], Stage)] = &[
    ("ABX", "Barrick Gold Corporation", "barrick", &[Commodity::Gold, Commodity::Copper], Stage::Producer),
    ("AEM", "Agnico Eagle Mines Limited", "agnico eagle", &[Commodity::Gold], Stage::Producer),
    ("K", "Kinross Gold Corporation", "kinross", &[Commodity::Gold], Stage::Producer),
    ("FM", "First Quantum Minerals Ltd.", "first quantum", &[Commodity::Copper, Commodity::Nickel, Commodity::Gold], Stage::Producer),
    ("LUN", "Lundin Mining Corporation", "lundin mining", &[Commodity::Copper, Commodity::Zinc, Commodity::Nickel], Stage::Producer),
    ("HBM", "Hudbay Minerals Inc.", "hudbay", &[Commodity::Copper, Commodity::Gold, Commodity::Zinc], Stage::Producer),
    ("TECK-B", "Teck Resources Limited", "teck", &[Commodity::Copper, Commodity::Zinc, Commodity::Coal], Stage::Producer),
    ("ELD", "Eldorado Gold Corporation", "eldorado gold", &[Commodity::Gold], Stage::Producer),
    ("CG", "Centerra Gold Inc.", "centerra gold", &[Commodity::Gold, Commodity::Copper], Stage::Producer),
    ("IMG", "IAMGOLD Corporation", "iamgold", &[Commodity::Gold], Stage::Producer),
    ("KL", "Kirkland Lake Gold Ltd.", "kirkland lake", &[Commodity::Gold], Stage::Producer),
    ("YRI", "Yamana Gold Inc.", "yamana", &[Commodity::Gold, Commodity::Silver], Stage::Producer),
    ("BTO", "B2Gold Corp.", "b2gold", &[Commodity::Gold], Stage::Producer),
    ("TXG", "Torex Gold Resources Inc.", "torex gold", &[Commodity::Gold], Stage::Producer),
    ("SEA", "Seabridge Gold Inc.", "seabridge gold", &[Commodity::Gold, Commodity::Copper], Stage::Developer),
    ("AGI", "Alamos Gold Inc.", "alamos gold", &[Commodity::Gold], Stage::Producer),
    ("FNV", "Franco-Nevada Corporation", "franco nevada", &[Commodity::Gold], Stage::Producer),
    ("WPM", "Wheaton Precious Metals Corp.", "wheaton precious", &[Commodity::Silver, Commodity::Gold], Stage::Producer),
    ("SIL", "SilverCrest Metals Inc.", "silvercrest", &[Commodity::Silver], Stage::Producer),
    ("PAAS", "Pan American Silver Corp.", "pan american silver", &[Commodity::Silver, Commodity::Gold], Stage::Producer),
    ("SSL", "Sandstorm Gold Ltd.", "sandstorm gold", &[Commodity::Gold], Stage::Producer),
    ("OR", "Osisko Gold Royalties Ltd", "osisko", &[Commodity::Gold], Stage::Producer),
    ("MAG", "MAG Silver Corp.", "mag silver", &[Commodity::Silver], Stage::Producer),
    ("CXB", "Calibre Mining Corp.", "calibre mining", &[Commodity::Gold], Stage::Producer),
    ("EDV", "Endeavour Mining Corporation", "endeavour mining", &[Commodity::Gold], Stage::Producer),
    ("MINE", "Magna Mining Inc.", "magna mining", &[Commodity::Nickel, Commodity::Copper], Stage::Developer),
];

/// Large TSX-listed miners used when no company sheet is configured.
pub fn canadian_miners() -> Vec<CompanyRecord> {
    CANADIAN_MINERS
        .iter()
        .map(|(ticker, name, alias, commodities, stage)| CompanyRecord {
            name: name.to_string(),
            ticker: ticker.to_string(),
            exchange: Exchange::Tsx,
            market_cap: None,
            sector: Some("Metals & Mining".to_string()),
            hq_location: None,
            commodities: commodities.to_vec(),
            geographies: Vec::new(),
            stage: Some(*stage),
            aliases: vec![alias.to_string()],
        })
        .collect()
}
