/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
mod helpers;

#[cfg(test)]
mod test {
    use crate::helpers::{PHOTOS_PAGE_1, failure_body};
    use chrono::{NaiveDate, TimeZone, Utc};
    use flickr::rest::{
        ApiError, ApiErrorCodes, FlickrError, MediaType, NoResponse, ParseError, Photo,
        PhotoCollection, UnknownResponse, load, translate,
    };

    const PHOTO_INFO: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<rsp stat="ok">
<photo id="2733" secret="123456" server="12" isfavorite="0" license="3" rotation="90" media="video">
	<owner nsid="12037949754@N01" username="Bees" realname="Cal Henderson" location="Bedford, UK" />
	<title>orford_castle_taster</title>
	<description>hello &amp; welcome</description>
	<visibility ispublic="1" isfriend="0" isfamily="0" />
	<dates posted="1100897479" taken="2004-11-19 12:51:19" takengranularity="0" lastupdate="1093022469" />
	<tags>
		<tag id="1234" author="12037949754@N01" raw="woo yay">wooyay</tag>
		<tag id="1235" author="12037949754@N01" raw="hoopla">hoopla</tag>
	</tags>
	<urls>
		<url type="photopage">http://www.flickr.com/photos/bees/2733/</url>
	</urls>
</photo>
</rsp>"#;

    #[test]
    fn photo_collection_from_list() {
        let collection: PhotoCollection = load(PHOTOS_PAGE_1.as_bytes()).unwrap();

        assert_eq!(collection.page, 1);
        assert_eq!(collection.pages, 2);
        assert_eq!(collection.per_page, 2);
        assert_eq!(collection.total, 3);

        let photo = &collection.photos[1];
        assert_eq!(photo.id, "2635");
        assert_eq!(photo.title, "test_03");
        assert_eq!(photo.owner.as_deref(), Some("47058503995@N01"));
        assert!(!photo.is_public);
        assert!(photo.is_friend && photo.is_family);
        assert_eq!(photo.tags, vec!["cat", "dog"]);
    }

    #[test]
    fn photo_from_info() {
        let photo: Photo = load(PHOTO_INFO.as_bytes()).unwrap();

        assert_eq!(photo.id, "2733");
        assert_eq!(photo.title, "orford_castle_taster");
        assert_eq!(
            photo.description.as_deref(),
            Some("hello & welcome")
        );
        assert_eq!(photo.owner.as_deref(), Some("12037949754@N01"));
        assert_eq!(photo.owner_name.as_deref(), Some("Bees"));
        assert_eq!(photo.media, MediaType::Video);
        assert!(photo.is_public && !photo.is_friend);
        assert_eq!(photo.tags, vec!["wooyay", "hoopla"]);
        assert_eq!(
            photo.date_uploaded,
            Some(Utc.timestamp_opt(1100897479, 0).unwrap())
        );
        assert_eq!(
            photo.date_taken,
            NaiveDate::from_ymd_opt(2004, 11, 19).and_then(|d| d.and_hms_opt(12, 51, 19))
        );
    }

    #[test]
    fn empty_collection() {
        let body = r#"<rsp stat="ok"><photos page="1" pages="0" perpage="100" total="0"/></rsp>"#;
        let collection: PhotoCollection = load(body.as_bytes()).unwrap();
        assert!(collection.photos.is_empty());
        assert_eq!(collection.pages, 0);
    }

    #[test]
    fn wrong_element_is_parse_error() {
        let body = r#"<rsp stat="ok"><person id="1"/></rsp>"#;
        let err = load::<PhotoCollection>(body.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            FlickrError::Parse(ParseError::UnexpectedElement { .. })
        ));
    }

    #[test]
    fn invalid_attribute_is_parse_error() {
        let body = r#"<rsp stat="ok"><photos page="one"/></rsp>"#;
        let err = load::<PhotoCollection>(body.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            FlickrError::Parse(ParseError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn empty_success_needs_a_type_that_allows_it() {
        let body = r#"<rsp stat="ok" />"#;
        assert_eq!(load::<NoResponse>(body.as_bytes()).unwrap(), NoResponse);
        assert_eq!(
            load::<UnknownResponse>(body.as_bytes()).unwrap(),
            UnknownResponse::default()
        );
        assert!(matches!(
            load::<PhotoCollection>(body.as_bytes()).unwrap_err(),
            FlickrError::Parse(ParseError::ResponseMissing)
        ));
    }

    #[test]
    fn unknown_status_is_parse_error() {
        let body = r#"<rsp stat="maybe"><photos/></rsp>"#;
        assert!(matches!(
            load::<PhotoCollection>(body.as_bytes()).unwrap_err(),
            FlickrError::Parse(ParseError::UnknownStatus(Some(_)))
        ));

        let body = r#"<rsp><photos/></rsp>"#;
        assert!(matches!(
            load::<PhotoCollection>(body.as_bytes()).unwrap_err(),
            FlickrError::Parse(ParseError::UnknownStatus(None))
        ));
    }

    #[test]
    fn malformed_failures_are_parse_errors() {
        let body = r#"<rsp stat="fail"></rsp>"#;
        assert!(matches!(
            load::<NoResponse>(body.as_bytes()).unwrap_err(),
            FlickrError::Parse(ParseError::MissingErrorElement)
        ));

        let body = failure_body("abc", "bad");
        assert!(matches!(
            load::<NoResponse>(body.as_bytes()).unwrap_err(),
            FlickrError::Parse(ParseError::InvalidErrorCode(_))
        ));
    }

    #[test]
    fn unknown_response_keeps_markup() {
        let body = r#"<rsp stat="ok"><user id="1" nsid="12@N01"><username>bees</username></user></rsp>"#;
        let resp: UnknownResponse = load(body.as_bytes()).unwrap();
        assert_eq!(resp.name.as_deref(), Some("user"));
        assert_eq!(resp.attr("nsid"), Some("12@N01"));
        assert_eq!(resp.inner_xml, "<username>bees</username>");
    }

    #[test]
    fn known_codes_map_to_dedicated_kinds() {
        let cases = [
            (1, ApiError::NotFound("m".into())),
            (96, ApiError::InvalidSignature("m".into())),
            (97, ApiError::MissingSignature("m".into())),
            (98, ApiError::LoginFailed("m".into())),
            (99, ApiError::InsufficientPermissions("m".into())),
            (100, ApiError::InvalidApiKey("m".into())),
            (105, ApiError::ServiceUnavailable("m".into())),
            (112, ApiError::MethodNotFound("m".into())),
            (
                429,
                ApiError::RateLimited {
                    message: "m".into(),
                    retry_after: None,
                },
            ),
        ];
        for (code, expected) in cases {
            let err = translate(code, "m");
            assert_eq!(err, expected);
            assert_eq!(err.code(), code);
            assert_eq!(err.message(), "m");
        }
        assert_eq!(u32::from(ApiErrorCodes::BadUrl), 116);
    }

    #[test]
    fn unmapped_codes_keep_wire_values() {
        for (code, msg) in [(0, ""), (2, "Unknown user"), (9999, "  spaced  ")] {
            let err = translate(code, msg);
            assert_eq!(
                err,
                ApiError::Generic {
                    code,
                    message: msg.to_string()
                }
            );
            assert_eq!(err.code(), code);
            assert_eq!(err.message(), msg);
        }
    }
}
