/// Look up an NFL team's abbreviation by its full provider name.
fn nfl_team_code(name: &str) -> Option<&'static str> {
    match name {
        "ARIZONA CARDINALS" => Some("ARI"),
        "ATLANTA FALCONS" => Some("ATL"),
        "BALTIMORE RAVENS" => Some("BAL"),
        "BUFFALO BILLS" => Some("BUF"),
        "CAROLINA PANTHERS" => Some("CAR"),
        "CHICAGO BEARS" => Some("CHI"),
        "CINCINNATI BENGALS" => Some("CIN"),
        "CLEVELAND BROWNS" => Some("CLE"),
        "DALLAS COWBOYS" => Some("DAL"),
        "DENVER BRONCOS" => Some("DEN"),
        "DETROIT LIONS" => Some("DET"),
        "GREEN BAY PACKERS" => Some("GB"),
        "HOUSTON TEXANS" => Some("HOU"),
        "INDIANAPOLIS COLTS" => Some("IND"),
        "JACKSONVILLE JAGUARS" => Some("JAX"),
        "KANSAS CITY CHIEFS" => Some("KC"),
        "LAS VEGAS RAIDERS" | "OAKLAND RAIDERS" => Some("LV"),
        "LOS ANGELES CHARGERS" | "LA CHARGERS" => Some("LAC"),
        "LOS ANGELES RAMS" | "LA RAMS" => Some("LAR"),
        "MIAMI DOLPHINS" => Some("MIA"),
        "MINNESOTA VIKINGS" => Some("MIN"),
        "NEW ENGLAND PATRIOTS" => Some("NE"),
        "NEW ORLEANS SAINTS" => Some("NO"),
        "NEW YORK GIANTS" | "NY GIANTS" => Some("NYG"),
        "NEW YORK JETS" | "NY JETS" => Some("NYJ"),
        "PHILADELPHIA EAGLES" => Some("PHI"),
        "PITTSBURGH STEELERS" => Some("PIT"),
        "SAN FRANCISCO 49ERS" => Some("SF"),
        "SEATTLE SEAHAWKS" => Some("SEA"),
        "TAMPA BAY BUCCANEERS" => Some("TB"),
        "TENNESSEE TITANS" => Some("TEN"),
        "WASHINGTON COMMANDERS" | "WASHINGTON FOOTBALL TEAM" => Some("WAS"),
        _ => None,
    }
}

/// Abbreviation for a full team name; unmapped names come back unchanged.
pub fn abbreviate(name: &str) -> String {
    let upper = name.trim().to_uppercase();
    match nfl_team_code(&upper) {
        Some(code) => code.to_string(),
        None => name.to_string(),
    }
}

/// `"<away> @ <home>"` using abbreviations.
pub fn matchup_key(away_team: &str, home_team: &str) -> String {
    format!("{} @ {}", abbreviate(away_team), abbreviate(home_team))
}
