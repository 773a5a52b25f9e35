//! Writes a small semicolon-delimited sample of dam registrations, covering
//! every status combination the viewer colors plus a few records with
//! missing or malformed geometry. Useful for exercising the filters, the
//! pagination and the map by hand.

use std::io::Write;

const CADASTRO_STATUSES: [&str; 3] = [
    "Selecionado para validação",
    "Descartado por duplicidade",
    "Descartado por hierarquia",
];

const MASSA_STATUSES: [&str; 2] = ["Compatível com polígono ANA", "Não aplicado"];

const COMPARACAO_STATUSES: [&str; 5] = [
    "Totalmente compatível",
    "Compatível parcialmente",
    "Compatível apenas geograficamente",
    "Incompatível",
    "Não aplicado",
];

const MATERIALS: [&str; 4] = ["Terra", "Concreto", "Enrocamento", "Terra/Enrocamento"];

fn main() {
    let path = "registros_sample.csv";
    let mut out = std::fs::File::create(path).expect("failed to create sample file");

    // UTF-8 BOM, same as the app's own CSV export
    out.write_all(b"\xEF\xBB\xBF").expect("failed to write BOM");

    writeln!(
        out,
        "CÓDIGO SNISB;DATA DO CADASTRO;ALTURA MÁXIMA FUNDAÇÃO;CAPACIDADE TOTAL;\
         TIPO DE MATERIAL;SITUACAO_CADASTRO_SNISB;SITUACAO_MASSA_DAGUA;\
         SITUACAO_COMPARACAO_SIOUT;PONTO_GEO"
    )
    .expect("failed to write header");

    let total = 120;
    for i in 0..total {
        let code = 20000 + i * 7;
        let year = 2019 + (i % 6);
        let month = 1 + (i % 12);
        let day = 1 + (i * 3) % 28;
        let height = 4.0 + (i % 25) as f64 * 1.3;
        let capacity = 15_000 + i * 4_321;
        let material = MATERIALS[i % MATERIALS.len()];
        let cadastro = CADASTRO_STATUSES[i % CADASTRO_STATUSES.len()];
        let massa = MASSA_STATUSES[i % MASSA_STATUSES.len()];
        let comparacao = COMPARACAO_STATUSES[i % COMPARACAO_STATUSES.len()];

        // Rio Grande do Sul sits roughly between lon -57..-50, lat -33..-27
        let lon = -57.0 + (i % 70) as f64 * 0.1;
        let lat = -33.0 + (i % 60) as f64 * 0.1;
        let ponto = match i % 15 {
            13 => String::new(),
            14 => "POINT(quebrado)".to_string(),
            _ => format!("POINT({lon:.4} {lat:.4})"),
        };

        writeln!(
            out,
            "{code};{year:04}-{month:02}-{day:02};{height:.1};{capacity};{material};\
             {cadastro};{massa};{comparacao};{ponto}"
        )
        .expect("failed to write row");
    }

    println!("Wrote {total} records to {path}");
}
