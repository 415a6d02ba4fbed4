use crate::storage::repository::RecordKind;
use crate::survey::model::CropLabel;
use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;

pub const USAGE: &str = "\
commands:
  submit <file>                        validate and store a survey submission (JSON)
  production [farmer|*] [crop]         list production records
  boundaries [farmer|*] [crop]         list field boundaries
  delete production|boundary <id>      remove one record
  reconcile                            link production and boundary data
  link <farmer> <crop>                 reconcile one farmer/crop pair
  area <file> [reference_lat]          estimate hectares for a ring or GeoJSON drawing
  check <file>                         validate the coordinates of a ring or drawing
  stats                                record counts and mapped area
  farmers                              farmer ids with production records
  recent [n]                           newest records of each kind (default 10)
  clear                                delete every record
  help                                 show this message";

const DEFAULT_RECENT: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Submit {
        path: PathBuf,
    },
    Production {
        farmer_id: Option<String>,
        crop: Option<CropLabel>,
    },
    Boundaries {
        farmer_id: Option<String>,
        crop: Option<CropLabel>,
    },
    Delete {
        kind: RecordKind,
        id: i32,
    },
    Reconcile,
    Link {
        farmer_id: String,
        crop: CropLabel,
    },
    Area {
        path: PathBuf,
        reference_latitude: Option<f64>,
    },
    Check {
        path: PathBuf,
    },
    Stats,
    Farmers,
    Recent {
        n: u64,
    },
    Clear,
    Help,
    Unknown(String),
}

/// Parsing never fails; bad input becomes [`AppCommand::Unknown`] carrying the usage text.
impl FromStr for AppCommand {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(AppCommand::Help);
        }

        match parts[0] {
            "submit" => match parts.get(1) {
                Some(path) => Ok(AppCommand::Submit {
                    path: PathBuf::from(path),
                }),
                None => Ok(unknown("usage: submit <file>")),
            },
            "production" | "boundaries" => {
                let farmer_id = parts
                    .get(1)
                    .filter(|f| **f != "*")
                    .map(|f| f.to_string());
                let crop = match parts.get(2).map(|c| c.parse::<CropLabel>()) {
                    None => None,
                    Some(Ok(crop)) => Some(crop),
                    Some(Err(e)) => return Ok(unknown(&e.to_string())),
                };
                if parts[0] == "production" {
                    Ok(AppCommand::Production { farmer_id, crop })
                } else {
                    Ok(AppCommand::Boundaries { farmer_id, crop })
                }
            }
            "delete" => {
                let kind = parts.get(1).and_then(|k| k.parse::<RecordKind>().ok());
                let id = parts.get(2).and_then(|i| i.parse::<i32>().ok());
                match (kind, id) {
                    (Some(kind), Some(id)) => Ok(AppCommand::Delete { kind, id }),
                    _ => Ok(unknown("usage: delete production|boundary <id>")),
                }
            }
            "reconcile" => Ok(AppCommand::Reconcile),
            "link" => {
                let crop = parts.get(2).and_then(|c| c.parse::<CropLabel>().ok());
                match (parts.get(1), crop) {
                    (Some(farmer_id), Some(crop)) => Ok(AppCommand::Link {
                        farmer_id: farmer_id.to_string(),
                        crop,
                    }),
                    _ => Ok(unknown("usage: link <farmer> <crop>")),
                }
            }
            "area" => {
                let Some(path) = parts.get(1) else {
                    return Ok(unknown("usage: area <file> [reference_lat]"));
                };
                let reference_latitude = match parts.get(2).map(|l| l.parse::<f64>()) {
                    None => None,
                    Some(Ok(lat)) if (-90.0..=90.0).contains(&lat) => Some(lat),
                    Some(_) => return Ok(unknown("reference latitude must be within -90..90")),
                };
                Ok(AppCommand::Area {
                    path: PathBuf::from(path),
                    reference_latitude,
                })
            }
            "check" => match parts.get(1) {
                Some(path) => Ok(AppCommand::Check {
                    path: PathBuf::from(path),
                }),
                None => Ok(unknown("usage: check <file>")),
            },
            "stats" => Ok(AppCommand::Stats),
            "farmers" => Ok(AppCommand::Farmers),
            "recent" => match parts.get(1).map(|n| n.parse::<u64>()) {
                None => Ok(AppCommand::Recent { n: DEFAULT_RECENT }),
                Some(Ok(n)) if n > 0 => Ok(AppCommand::Recent { n }),
                Some(_) => Ok(unknown("usage: recent [n]")),
            },
            "clear" => Ok(AppCommand::Clear),
            "help" | "-h" | "--help" => Ok(AppCommand::Help),
            other => Ok(unknown(&format!("unknown command: {other}"))),
        }
    }
}

fn unknown(reason: &str) -> AppCommand {
    AppCommand::Unknown(format!("{reason}\n\n{USAGE}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> AppCommand {
        s.parse().unwrap()
    }

    #[test]
    fn parses_listing_filters() {
        assert_eq!(
            parse("production"),
            AppCommand::Production {
                farmer_id: None,
                crop: None
            }
        );
        assert_eq!(
            parse("boundaries * kava"),
            AppCommand::Boundaries {
                farmer_id: None,
                crop: Some(CropLabel::Kava)
            }
        );
        assert_eq!(
            parse("production HH-001 Cocoa"),
            AppCommand::Production {
                farmer_id: Some("HH-001".to_string()),
                crop: Some(CropLabel::Cocoa)
            }
        );
    }

    #[test]
    fn parses_delete_and_link() {
        assert_eq!(
            parse("delete boundary 7"),
            AppCommand::Delete {
                kind: RecordKind::Boundary,
                id: 7
            }
        );
        assert_eq!(
            parse("link HH-001 Kava"),
            AppCommand::Link {
                farmer_id: "HH-001".to_string(),
                crop: CropLabel::Kava
            }
        );
    }

    #[test]
    fn parses_area_with_optional_latitude() {
        assert_eq!(
            parse("area ring.json -13.8"),
            AppCommand::Area {
                path: PathBuf::from("ring.json"),
                reference_latitude: Some(-13.8)
            }
        );
        assert!(matches!(parse("area ring.json 120"), AppCommand::Unknown(_)));
        assert_eq!(
            parse("check drawing.geojson"),
            AppCommand::Check {
                path: PathBuf::from("drawing.geojson")
            }
        );
    }

    #[test]
    fn defaults_and_help() {
        assert_eq!(parse("recent"), AppCommand::Recent { n: 10 });
        assert_eq!(parse("recent 3"), AppCommand::Recent { n: 3 });
        assert_eq!(parse(""), AppCommand::Help);
        assert_eq!(parse("--help"), AppCommand::Help);
    }

    #[test]
    fn bad_input_carries_usage() {
        for input in ["delete thing 1", "link HH-001", "production HH-001 Taro", "frobnicate"] {
            match parse(input) {
                AppCommand::Unknown(msg) => assert!(msg.contains("commands:"), "{input}"),
                other => panic!("{input} parsed as {other:?}"),
            }
        }
    }
}
