//! Shared fixture: the tutorial route table exercised by the integration
//! tests, including its deliberate duplicate registration and
//! registration-order traps.

use routetable::{Args, BodyField, BodySchema, EnumSpec, ParamSpec, Router, RouteSpec};
use serde_json::{json, Value};

pub fn model_name_spec() -> EnumSpec {
    EnumSpec::new("ModelName", &[("a", "abc"), ("b", "def"), ("c", "ghi")])
}

pub fn item_schema() -> BodySchema {
    BodySchema::new("Item")
        .field(BodyField::str("name"))
        .field(BodyField::str("description").optional())
        .field(BodyField::float("price"))
        .field(BodyField::float("tax").optional())
}

pub fn catalog() -> Vec<Value> {
    vec![
        json!({"item_name": "Foo"}),
        json!({"item_name": "Bar"}),
        json!({"item_name": "Baz"}),
    ]
}

const LONG_DESCRIPTION: &str = "This is an amazing item that has a long description";

pub fn demo_router() -> Router {
    let models = model_name_spec();
    let model_routes = models.clone();

    Router::new()
        .get("/", RouteSpec::none(), |_| Ok(json!({"message": "Hello World"})))
        .get(
            "/items/:item_id",
            RouteSpec::none().param(ParamSpec::int("item_id")),
            |args: Args| Ok(json!({"item_id": args.int("item_id").unwrap()})),
        )
        // Fixed paths must be registered before variable ones.
        .get("/users/me", RouteSpec::none(), |_| {
            Ok(json!({"user_id": "the_current_user"}))
        })
        .get("/users/:user_id", RouteSpec::none(), |args: Args| {
            Ok(json!({"user_id": args.str("user_id").unwrap()}))
        })
        // Duplicate registration: the first one wins, always.
        .get("/users", RouteSpec::none(), |_| Ok(json!(["Rick", "Morty"])))
        .get("/users", RouteSpec::none(), |_| Ok(json!(["Bean", "Elfo"])))
        .get(
            "/models/:model_name",
            RouteSpec::none().param(ParamSpec::enumerated("model_name", models)),
            move |args: Args| {
                let wire = args.str("model_name").unwrap().to_owned();
                let member = model_routes.member_for_wire(&wire);
                let message = match member {
                    Some(m) if m.tag() == "a" => "oh",
                    Some(m) if m.wire() == "ghi" => "hi",
                    _ => "el gato",
                };
                Ok(json!({"model_name": wire, "message": message}))
            },
        )
        .get("/files/*file_path", RouteSpec::none(), |args: Args| {
            Ok(json!({"file_path": args.str("file_path").unwrap()}))
        })
        .get(
            "/items/",
            RouteSpec::none()
                .param(ParamSpec::int("skip").default_value(json!(0)))
                .param(ParamSpec::int("limit").default_value(json!(10))),
            |args: Args| {
                let skip = args.int("skip").unwrap_or(0).max(0) as usize;
                let limit = args.int("limit").unwrap_or(10).max(0) as usize;
                let page: Vec<Value> = catalog().into_iter().skip(skip).take(limit).collect();
                Ok(json!(page))
            },
        )
        .get(
            "/things/:thing_id",
            RouteSpec::none()
                .param(ParamSpec::str("q").optional())
                .param(ParamSpec::bool("short").default_value(json!(false))),
            |args: Args| {
                let mut thing = json!({"thing_id": args.str("thing_id").unwrap()});
                if let Some(q) = args.str("q") {
                    thing["q"] = json!(q);
                }
                if !args.bool("short").unwrap_or(false) {
                    thing["description"] = json!(LONG_DESCRIPTION);
                }
                Ok(thing)
            },
        )
        .get(
            "/users/:user_id/items/:item_id",
            RouteSpec::none()
                .param(ParamSpec::int("user_id"))
                .param(ParamSpec::str("q").optional())
                .param(ParamSpec::bool("short").default_value(json!(false))),
            |args: Args| {
                let mut item = json!({
                    "item_id": args.str("item_id").unwrap(),
                    "owner_id": args.int("user_id").unwrap(),
                });
                if let Some(q) = args.str("q") {
                    item["q"] = json!(q);
                }
                if !args.bool("short").unwrap_or(false) {
                    item["description"] = json!(LONG_DESCRIPTION);
                }
                Ok(item)
            },
        )
        .post(
            "/items/",
            RouteSpec::none().body(item_schema()),
            |args: Args| {
                let mut item = args.body().cloned().unwrap_or_else(|| json!({}));
                let has_tax = args.body_field("tax").map(|v| !v.is_null()).unwrap_or(false);
                if has_tax {
                    let total = args.body_number("price")? + args.body_number("tax")?;
                    item["price_with_tax"] = json!(total);
                }
                Ok(item)
            },
        )
        .put(
            "/items/:item_id",
            RouteSpec::none()
                .param(ParamSpec::int("item_id"))
                .body(item_schema()),
            |args: Args| {
                let mut merged = args.body().cloned().unwrap_or_else(|| json!({}));
                merged["item_id"] = json!(args.int("item_id").unwrap());
                Ok(merged)
            },
        )
        .get(
            "/fruits/",
            RouteSpec::none().param(
                ParamSpec::str("q")
                    .optional()
                    .min_length(3)
                    .max_length(50)
                    .pattern("^fixedquery$"),
            ),
            |args: Args| {
                let mut results = json!({"items": [{"item_id": "Foo"}, {"item_id": "Bar"}]});
                if let Some(q) = args.str("q") {
                    results["q"] = json!(q);
                }
                Ok(results)
            },
        )
        .get(
            "/vegetables/",
            RouteSpec::none().param(
                ParamSpec::str_list("q")
                    .alias("veg")
                    .min_length(3)
                    .default_value(json!([])),
            ),
            |args: Args| Ok(json!({"q": args.get("q").cloned().unwrap_or_else(|| json!([]))})),
        )
        .get(
            "/stones/",
            RouteSpec::none().param(
                ParamSpec::str("q")
                    .alias("stone-query")
                    .optional()
                    .min_length(3)
                    .max_length(50)
                    .pattern("^hard$")
                    .deprecated(),
            ),
            |args: Args| {
                let mut results = json!({"items": [{"item_id": "Foo"}, {"item_id": "Bar"}]});
                if let Some(q) = args.str("q") {
                    results["q"] = json!(q);
                }
                Ok(results)
            },
        )
}
