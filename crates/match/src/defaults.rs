//! Built-in normalization tables. Every table can be replaced from the
//! policy TOML; these are what an empty config resolves to.

/// Long form → abbreviated form. Keys may be multi-word phrases.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("domaine", "dom."),
    ("domini", "dom."),
    ("dominio", "dom."),
    ("chateau", "ch."),
    ("agricola", "agr."),
    ("weingut", "weing."),
    ("bodegas", "bod."),
    ("cantine", "cant."),
    ("cantina", "cant."),
    ("tenuta", "ten."),
    ("vinicole", "vin."),
    ("saint", "st."),
    ("estate", "est."),
    ("vigneron", "vign."),
    ("castello", "cast."),
    ("fattoria", "fatt."),
    ("distillery", "dist."),
    ("distilleria", "dist."),
    ("fratelli", "f.lli"),
    ("doctor", "dr."),
    ("poderi", "pod."),
    ("marques", "marq."),
    ("marchesi", "march."),
    ("azienda agricola", "az.agr."),
    ("brothers", "bros."),
    ("sainte", "ste."),
    ("societa agricola", "soc.agr."),
    ("mount", "mt."),
    ("gebruder", "gebr."),
    ("champ.", "ch."),
    ("champagne", "ch."),
];

pub const STATIC_STOPWORDS: &[&str] = &[
    "aa", "ab", "abbazia", "ag", "alta", "and", "at", "az", "azienda", "bds", "beer",
    "bierbrouwerij", "bieres", "birra", "birras", "bodega", "brasserie", "brauerei",
    "breweries", "brewers", "brewery", "brewing", "brouwerij", "bryggeri", "brygghus",
    "bryghus", "by", "c", "casa", "casas", "cellar", "cellars", "co", "comp", "compania",
    "company", "coop", "corp", "creek", "crl", "cspa", "das", "de", "di", "distillerie",
    "do", "du", "e", "el", "estates", "family", "farm", "fe", "gmbh", "gran", "grand",
    "group", "grupo", "hills", "house", "il", "inc", "incorporated", "les", "limited",
    "limitee", "llc", "long", "ltd", "martin", "merchant", "monte", "nuevo", "of", "plc",
    "port", "prod", "productions", "pty", "ridge", "royal", "sa", "sca", "sl", "soc",
    "sociedade", "sociedad", "societa", "societe", "spa", "spanish", "spirits", "srl", "ss",
    "supermarkets", "the", "urban", "valley", "veuve", "view", "vignerons", "vinedos",
    "vineyard", "vineyards", "vinos", "vintners", "vit", "viticultor", "vitivinicola",
    "weinbau", "weinhaus", "weinkellerei", "wine", "winemaker", "wineries", "winery",
    "wines", "winework", "y",
];

pub const LEGAL_SUFFIXES: &[&str] = &[
    "ab", "ag", "as", "asa", "bv", "co", "corp", "cspa", "gmbh", "inc", "kg", "llc", "ltd",
    "nv", "oy", "plc", "pty", "sa", "sarl", "sas", "sca", "sl", "spa", "srl", "ss",
];

/// English country name → retailer (Norwegian) country name.
pub const COUNTRY_TRANSLATIONS: &[(&str, &str)] = &[
    ("italy", "italia"),
    ("france", "frankrike"),
    ("germany", "tyskland"),
    ("spain", "spania"),
    ("austria", "osterrike"),
    ("norway", "norge"),
    ("sweden", "sverige"),
    ("denmark", "danmark"),
    ("netherlands", "nederland"),
    ("the netherlands", "nederland"),
    ("ireland", "irland"),
    ("belgium", "belgia"),
    ("greece", "hellas"),
    ("hungary", "ungarn"),
    ("croatia", "kroatia"),
    ("finland", "finland"),
    ("slovakia", "slovakia"),
    ("poland", "polen"),
    ("south africa", "sor-afrika"),
    ("usa", "usa"),
    ("england", "england"),
    ("chile", "chile"),
    ("united kingdom", "storbritannia"),
    ("argentina", "argentina"),
    ("israel", "israel"),
    ("mexico", "mexico"),
    ("luxembourg", "luxemburg"),
    ("switzerland", "sveits"),
    ("lebanon", "libanon"),
    ("malta", "malta"),
    ("slovenia", "slovenia"),
    ("montenegro", "montenegro"),
    ("tasmania", "tasmania"),
    ("cyprus", "kypros"),
    ("turkey", "turkia"),
    ("venezuela", "venezuela"),
    ("scotland", "scotland"),
    ("georgia", "georgia"),
    ("thailand", "thailand"),
    ("new zealand", "new zealand"),
    ("portugal", "portugal"),
    ("uruguay", "uruguay"),
    ("brazil", "brasil"),
    ("japan", "japan"),
    ("australia", "australia"),
    ("canada", "canada"),
];

pub const SKIP_COUNTRIES_ON_MISMATCH: &[&str] = &["usa", "canada"];

/// Words retailers tend to leave out of producer names.
pub const VARIANT_EXCLUDED_WORDS: &[&str] = &[
    "winery", "company", "pty", "ltd", "ltd.", "vineyard", "estate", "plc", "cellar",
    "winemaker", "group", "international", "wines", "limited", "agricola", "winework",
    "wineries", "farm", "family", "vigneron", "merchant", "at", "of", "the", "tasting",
    "room", "l.l.c.", "s.r.l.", "s.p.a", "c.", "vinegarden", "s.a.", "cellars", "brands",
    "signature", "ranch", "distilleries", "inc", "organic", "sons",
];

pub const VARIANT_TRAILING_WORDS: &[&str] = &["and", "wines", "wine", "spirits"];

pub const VARIANT_GENERIC_NAMES: &[&str] = &["wine", "hills", "creek", "view", "weingut"];

pub const RETAILER_TYPE_FILTER: &[&str] = &["vin", "Champagne"];
