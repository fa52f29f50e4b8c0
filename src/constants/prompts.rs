/// Themes a question can be generated for.
pub const CONTEXTS: &[&str] = &[
    "piccante",
    "imbarazzante",
    "provocatorio",
    "cringe",
    "malizioso",
    "tabù",
    "cattivo",
    "controverso",
    "vergognoso",
    "intimo",
    "sospetto",
    "codardo",
    "tradimento",
    "crush",
    "vergogna scolastica",
    "prima esperienza",
    "segreto mai confessato",
    "desiderio nascosto",
    "piacere proibito",
    "paura più grande",
    "ossessione",
    "tabù sociale",
    "infanzia",
];

/// Secondary modifier narrowing the kind of situation the question describes.
pub const SCENARIOS: &[&str] = &["reale", "ipotetico", "assurdo", "accuse scherzose"];

pub const PROMPT_INTRO: &str =
    "Sei un generatore creativo di una singola domanda per un gruppo di amici.";

pub const PROMPT_REQUIREMENTS: &str = r#"Requisiti per la domanda:
- Deve richiedere come risposta un nome presente nel gruppo.
- Può iniziare in modi diversi (es. "Chi", "Quale persona", "Cosa succederebbe se", ecc.), NON usare sempre la stessa formula.
- Evita domande prevedibili, cliché o simili a quelle generate in precedenza.
- La domanda deve essere originale, stimolante e capace di sorprendere.
- Non menzionare persone al di fuori del gruppo."#;

pub const TEXT_ONLY_OUTPUT: &str = r#"- Non includere testo extra: genera solo la domanda, niente introduzioni o conclusioni.

Ora genera una sola domanda originale, rispettando queste indicazioni."#;

pub const IMAGE_OUTPUT: &str = r#"- Genera anche un prompt in inglese per un generatore di immagini: una foto realistica e cinematografica che illustri la domanda, senza testo nell'immagine e senza volti riconoscibili.

Rispondi SOLO con un oggetto JSON con esattamente questi due campi, senza testo prima o dopo:
{"question": "<la domanda>", "image_prompt": "<il prompt per l'immagine>"}"#;
