// src/query.rs

/// Renders the candidate query: NADD collection members (humans, no P7763)
/// with referenced object type and title, grouped per item, shuffled by
/// `seed` and capped at `limit` rows.
pub fn build_query(limit: u32, seed: u64) -> String {
    format!(
        r#"PREFIX wd:   <http://www.wikidata.org/entity/>
PREFIX wdt:  <http://www.wikidata.org/prop/direct/>
PREFIX p:    <http://www.wikidata.org/prop/>
PREFIX ps:   <http://www.wikidata.org/prop/statement/>
PREFIX pr:   <http://www.wikidata.org/prop/reference/>
PREFIX prov: <http://www.w3.org/ns/prov#>
PREFIX wikibase: <http://wikiba.se/ontology#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX bd:   <http://www.bigdata.com/rdf#>

SELECT
  ?item ?itemLabel
  ?objectsoortLabel
  ?objecttitel
  ?werklocatieLabel
  ?beroepLabel
  ?collectieLabel
  (?floruitYear1 AS ?floruit)
WHERE {{
  {{
    SELECT
      ?item
      (SAMPLE(?objectsoort) AS ?objectsoort)
      (SAMPLE(?objecttitel) AS ?objecttitel)
      (SAMPLE(?werkloc0)    AS ?werklocatie)
      (SAMPLE(?beroep0)     AS ?beroep)
      (SAMPLE(?collectie0)  AS ?collectie)
      (SAMPLE(?fy)          AS ?floruitYear1)
    WHERE {{
      ?item wdt:P6379 wd:Q1616123 ;
            wdt:P31  wd:Q5 .

      OPTIONAL {{ ?item wdt:P1317 ?floruit1 . BIND(YEAR(?floruit1) AS ?fy) }}
      OPTIONAL {{ ?item wdt:P937  ?werkloc0. }}
      OPTIONAL {{ ?item wdt:P106  ?beroep0. }}
      OPTIONAL {{ ?item wdt:P6379 ?collectie0. }}
      FILTER NOT EXISTS {{ ?item wdt:P7763 [] . }}

      ?item p:P6379 [
        ps:P6379 wd:Q1616123 ;
        prov:wasDerivedFrom [
          pr:P3865 ?objectsoort ;
          pr:P1476 ?objecttitel
        ]
      ] .
    }}
    GROUP BY ?item
  }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "[AUTO_LANGUAGE],mul,nl,en". }}
}}
ORDER BY MD5(CONCAT(STR(?item), "{seed}"))
LIMIT {limit}
"#
    )
}
