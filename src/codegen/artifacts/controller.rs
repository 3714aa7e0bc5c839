use crate::codegen::model::{JavaField, JavaMethod, JavaType, Param};
use crate::codegen::utils::{to_kebab_case, uncapitalize};
use crate::conventions::ControllerBaseChoice;
use crate::error::Result;
use crate::pipeline::GenerationContext;

const WEB_ANNOTATIONS: &str = "org.springframework.web.bind.annotation";

/// Placement-independent decisions for the controller
#[derive(Debug, Clone)]
pub struct ControllerOptions<'a> {
    /// Route prefix, `/api/` or `/`
    pub prefix: &'a str,
    pub base: Option<&'a ControllerBaseChoice>,
    /// Add Swagger `@Api`/`@ApiOperation` annotations
    pub api_docs: bool,
}

/// REST controller exposing save, delete, list and page-query endpoints
pub fn controller(package: &str, ctx: &GenerationContext, options: &ControllerOptions) -> Result<JavaType> {
    let service = ctx.service()?;
    let dto = ctx.dto()?;
    let query = ctx.query()?;

    let entity_name = &ctx.entity.name;
    let suffix = options.base.map_or("Controller", |b| b.suffix.as_str());
    let variable = uncapitalize(entity_name);
    let service_field = format!("{}Service", variable);

    let mut ty = JavaType::class(package, &format!("{}{}", entity_name, suffix));
    for annotation in ["RequestMapping", "RestController", "PostMapping", "DeleteMapping", "GetMapping", "RequestBody", "PathVariable"] {
        ty.import(format!("{}.{}", WEB_ANNOTATIONS, annotation));
    }
    ty.import(format!("{}.annotation.Resource", ctx.entity.platform_namespace()))
        .import("java.util.List")
        .import("com.github.pagehelper.PageInfo")
        .import(service.qualified_name())
        .import(dto.qualified_name())
        .import(query.qualified_name())
        .annotate(format!("@RequestMapping(\"{}{}\")", options.prefix, to_kebab_case(entity_name)))
        .annotate("@RestController");

    if options.api_docs {
        ty.import("io.swagger.annotations.Api")
            .import("io.swagger.annotations.ApiOperation")
            .annotate(format!("@Api(tags = \"{} controller\")", entity_name));
    }

    if let Some(base) = options.base {
        ty.import(base.qualified_name.clone());
        ty.extends.push(base.class.clone());
    }

    ty.field(JavaField::new(service.name.clone(), service_field.clone()).annotated("@Resource"));

    let endpoints = vec![
        (
            "Save",
            "@PostMapping(\"/save\")",
            JavaMethod::implementation(
                "void",
                "save",
                vec![Param::new(dto.name.clone(), variable.clone()).annotated("@RequestBody")],
                vec![format!("{}.save({});", service_field, variable)],
            ),
        ),
        (
            "Delete by id",
            "@DeleteMapping(\"/delete/{id}\")",
            JavaMethod::implementation(
                "void",
                "delete",
                vec![Param::new("Long", "id").annotated("@PathVariable(\"id\")")],
                vec![format!("{}.delete(id);", service_field)],
            ),
        ),
        (
            "List all",
            "@GetMapping(\"/list\")",
            JavaMethod::implementation(
                format!("List<{}>", dto.name),
                "list",
                vec![],
                vec![format!("return {}.findAll();", service_field)],
            ),
        ),
        (
            "Page query",
            "@PostMapping(\"/page-query\")",
            JavaMethod::implementation(
                format!("PageInfo<{}>", dto.name),
                "pageQuery",
                vec![Param::new(query.name.clone(), "query").annotated("@RequestBody")],
                vec![format!("return {}.pageQuery(query);", service_field)],
            ),
        ),
    ];

    for (summary, mapping, method) in endpoints {
        let method = if options.api_docs {
            method.annotated(format!("@ApiOperation(\"{}\")", summary))
        } else {
            method
        };
        ty.method(method.annotated(mapping));
    }

    Ok(ty)
}
