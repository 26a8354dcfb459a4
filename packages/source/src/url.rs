//! Report page URLs.
//!
//! The portal serves every report from one PHP entry point, selected by
//! query parameters:
//!
//! ```text
//! index.php?opcao=opt_03&subopcao=subopt_01&ano=2020
//! ```

use reqwest::Url;
use vitibrasil_report_models::ReportRequest;

/// Entry point of the public portal.
pub const DEFAULT_BASE_URL: &str = "http://vitibrasil.cnpuv.embrapa.br/index.php";

/// Builds the URL of the report page addressed by `request`.
///
/// Any query already present on `base` is kept and the report parameters
/// are appended after it.
#[must_use]
pub fn report_url(base: &Url, request: &ReportRequest) -> Url {
    let mut url = base.clone();

    {
        let mut query = url.query_pairs_mut();
        query.append_pair(
            "opcao",
            &format!("opt_{:02}", request.category().option_code()),
        );
        if let Some(sub) = request.sub_category() {
            query.append_pair("subopcao", &format!("subopt_{:02}", sub.code()));
        }
        query.append_pair("ano", &request.year().to_string());
    }

    url
}

#[cfg(test)]
mod tests {
    use vitibrasil_report_models::ReportCategory;

    use super::*;

    fn base() -> Url {
        Url::parse(DEFAULT_BASE_URL).unwrap()
    }

    #[test]
    fn production_url() {
        let request = ReportRequest::from_path(ReportCategory::Production, None, "2023").unwrap();
        assert_eq!(
            report_url(&base(), &request).as_str(),
            "http://vitibrasil.cnpuv.embrapa.br/index.php?opcao=opt_02&ano=2023"
        );
    }

    #[test]
    fn url_with_sub_category() {
        let request =
            ReportRequest::from_path(ReportCategory::Processing, Some("sem_classificacao"), "1999")
                .unwrap();
        assert_eq!(
            report_url(&base(), &request).as_str(),
            "http://vitibrasil.cnpuv.embrapa.br/index.php?opcao=opt_03&subopcao=subopt_04&ano=1999"
        );

        let request =
            ReportRequest::from_path(ReportCategory::Export, Some("suco_de_uva"), "2024").unwrap();
        assert_eq!(
            report_url(&base(), &request).query(),
            Some("opcao=opt_06&subopcao=subopt_04&ano=2024")
        );

        let request =
            ReportRequest::from_path(ReportCategory::Import, Some("suco_de_uva"), "2024").unwrap();
        assert_eq!(
            report_url(&base(), &request).query(),
            Some("opcao=opt_05&subopcao=subopt_05&ano=2024")
        );
    }

    #[test]
    fn keeps_existing_query() {
        let base = Url::parse("http://localhost:8000/index.php?lang=pt").unwrap();
        let request =
            ReportRequest::from_path(ReportCategory::Commercialization, None, "2001").unwrap();
        assert_eq!(
            report_url(&base, &request).query(),
            Some("lang=pt&opcao=opt_04&ano=2001")
        );
    }
}
